use super::*;

const CASE_WITH_INTAKE_SELECT: &str = r#"
    SELECT
        c.id, c.created_at, c.updated_at, c.intake_id, c.case_number, c.status,
        c.assigned_to, c.due_date, c.notes,
        i.created_at AS intake_created_at,
        i.name AS intake_name,
        i.email AS intake_email,
        i.phone AS intake_phone,
        i.business_stage AS intake_business_stage,
        i.service_needed AS intake_service_needed,
        i.message AS intake_message
    FROM filing_cases c
    LEFT JOIN intake_submissions i ON i.id = c.intake_id
"#;

impl PostgresCaseRepository {
    pub(super) async fn create_case_impl(&self, case: NewFilingCase) -> AppResult<FilingCase> {
        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            INSERT INTO filing_cases (id, created_at, updated_at, intake_id, case_number, status)
            VALUES ($1, $2, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at, intake_id, case_number, status,
                      assigned_to, due_date, notes
            "#,
        )
        .bind(CaseId::new().as_uuid())
        .bind(case.created_at)
        .bind(case.intake_id.as_uuid())
        .bind(case.case_number.as_str())
        .bind(case.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            conflict_or_internal(
                error,
                "insert filing case",
                &format!("case number '{}' already exists", case.case_number),
            )
        })?;

        FilingCase::try_from(row)
    }

    pub(super) async fn find_case_impl(
        &self,
        case_id: CaseId,
    ) -> AppResult<Option<CaseWithIntake>> {
        let query = format!("{CASE_WITH_INTAKE_SELECT} WHERE c.id = $1 LIMIT 1");
        let row = sqlx::query_as::<_, CaseWithIntakeRow>(&query)
            .bind(case_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find case: {error}")))?;

        row.map(CaseWithIntake::try_from).transpose()
    }

    pub(super) async fn list_cases_impl(
        &self,
        filter: CaseStatusFilter,
    ) -> AppResult<Vec<CaseWithIntake>> {
        let status = match filter {
            CaseStatusFilter::All => None,
            CaseStatusFilter::Only(status) => Some(status.as_str()),
        };
        let query = format!(
            "{CASE_WITH_INTAKE_SELECT} WHERE ($1::TEXT IS NULL OR c.status = $1) \
             ORDER BY c.created_at DESC"
        );

        let rows = sqlx::query_as::<_, CaseWithIntakeRow>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list cases: {error}")))?;

        rows.into_iter().map(CaseWithIntake::try_from).collect()
    }

    pub(super) async fn update_case_impl(
        &self,
        case_id: CaseId,
        patch: &CasePatch,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<CaseWithIntake>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start case update transaction: {error}"))
        })?;

        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT id, created_at, updated_at, intake_id, case_number, status,
                   assigned_to, due_date, notes
            FROM filing_cases
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(case_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to lock case: {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut case = FilingCase::try_from(row)?;
        patch.apply_to(&mut case);

        sqlx::query(
            r#"
            UPDATE filing_cases
            SET status = $2, assigned_to = $3, due_date = $4, notes = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(case_id.as_uuid())
        .bind(case.status.as_str())
        .bind(case.assigned_to.as_deref())
        .bind(case.due_date)
        .bind(case.notes.as_deref())
        .bind(updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update case: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit case update: {error}"))
        })?;

        self.find_case_impl(case_id).await
    }

    pub(super) async fn case_number_exists_impl(
        &self,
        case_number: &CaseNumber,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM filing_cases WHERE case_number = $1)
            "#,
        )
        .bind(case_number.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up case number: {error}")))
    }
}
