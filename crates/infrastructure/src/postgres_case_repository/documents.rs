use super::*;

impl PostgresCaseRepository {
    pub(super) async fn create_document_impl(
        &self,
        document: CaseDocument,
    ) -> AppResult<CaseDocument> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO case_documents (id, case_id, filename, mime, size, storage_path, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, case_id, filename, mime, size, storage_path, uploaded_at
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.case_id.as_uuid())
        .bind(document.filename.as_str())
        .bind(document.mime.as_str())
        .bind(document.size)
        .bind(document.storage_path.as_str())
        .bind(document.uploaded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                "insert case document",
                &format!("document at '{}' already exists", document.storage_path),
            )
        })?;

        Ok(CaseDocument::from(row))
    }

    pub(super) async fn list_documents_impl(
        &self,
        case_id: CaseId,
    ) -> AppResult<Vec<CaseDocument>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, case_id, filename, mime, size, storage_path, uploaded_at
            FROM case_documents
            WHERE case_id = $1
            ORDER BY uploaded_at DESC
            "#,
        )
        .bind(case_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list case documents: {error}")))?;

        Ok(rows.into_iter().map(CaseDocument::from).collect())
    }

    pub(super) async fn find_document_impl(
        &self,
        case_id: CaseId,
        document_id: DocumentId,
    ) -> AppResult<Option<CaseDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, case_id, filename, mime, size, storage_path, uploaded_at
            FROM case_documents
            WHERE id = $1 AND case_id = $2
            LIMIT 1
            "#,
        )
        .bind(document_id.as_uuid())
        .bind(case_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find case document: {error}")))?;

        Ok(row.map(CaseDocument::from))
    }

    pub(super) async fn delete_document_impl(&self, document_id: DocumentId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM case_documents
            WHERE id = $1
            "#,
        )
        .bind(document_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete case document: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}
