use super::*;

impl PostgresCaseRepository {
    pub(super) async fn create_intake_impl(
        &self,
        submission: &IntakeSubmission,
        created_at: DateTime<Utc>,
    ) -> AppResult<IntakeRecord> {
        let row = sqlx::query_as::<_, IntakeRow>(
            r#"
            INSERT INTO intake_submissions (
                id, created_at, name, email, phone, business_stage, service_needed, message
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, created_at, name, email, phone, business_stage, service_needed, message
            "#,
        )
        .bind(IntakeId::new().as_uuid())
        .bind(created_at)
        .bind(submission.name())
        .bind(submission.email().as_str())
        .bind(submission.phone())
        .bind(submission.business_stage())
        .bind(submission.service_needed())
        .bind(submission.message())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert intake: {error}")))?;

        Ok(IntakeRecord::from(row))
    }
}
