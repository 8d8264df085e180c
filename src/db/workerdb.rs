// db/workerdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::workermodel::{ApprovalStatus, WorkerProfile};

#[async_trait]
pub trait WorkerExt {
    async fn get_worker_profile(&self, user_id: Uuid) -> Result<Option<WorkerProfile>, Error>;

    /// Candidates for auto-assignment, prefiltered in SQL by the eligibility
    /// predicate. Ordered by creation time so score ties break on a stable
    /// input order.
    async fn get_assignable_workers(&self, service_id: Uuid) -> Result<Vec<WorkerProfile>, Error>;

    async fn create_worker_profile(
        &self,
        user_id: Uuid,
        skills: Vec<Uuid>,
        location: String,
        experience_years: i32,
        max_capacity: i32,
        approval_status: ApprovalStatus,
        id_verified: bool,
        skills_verified: bool,
        background_check_status: ApprovalStatus,
    ) -> Result<WorkerProfile, Error>;

    async fn set_worker_availability(
        &self,
        user_id: Uuid,
        is_available: bool,
    ) -> Result<WorkerProfile, Error>;

    /// `current_jobs` is derived, never incremented in place: recount the
    /// worker's active bookings and persist the result.
    async fn recompute_current_jobs(&self, user_id: Uuid) -> Result<i32, Error>;
}

#[async_trait]
impl WorkerExt for DBClient {
    async fn get_worker_profile(&self, user_id: Uuid) -> Result<Option<WorkerProfile>, Error> {
        sqlx::query_as::<_, WorkerProfile>("SELECT * FROM worker_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_assignable_workers(&self, service_id: Uuid) -> Result<Vec<WorkerProfile>, Error> {
        sqlx::query_as::<_, WorkerProfile>(
            r#"
            SELECT * FROM worker_profiles
            WHERE approval_status = 'approved'
              AND id_verified = TRUE
              AND skills_verified = TRUE
              AND background_check_status = 'approved'
              AND is_available = TRUE
              AND current_jobs < max_capacity
              AND (cardinality(skills) = 0 OR $1 = ANY(skills))
            ORDER BY created_at ASC
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_worker_profile(
        &self,
        user_id: Uuid,
        skills: Vec<Uuid>,
        location: String,
        experience_years: i32,
        max_capacity: i32,
        approval_status: ApprovalStatus,
        id_verified: bool,
        skills_verified: bool,
        background_check_status: ApprovalStatus,
    ) -> Result<WorkerProfile, Error> {
        sqlx::query_as::<_, WorkerProfile>(
            r#"
            INSERT INTO worker_profiles
                (user_id, skills, location, experience_years, max_capacity,
                 approval_status, id_verified, skills_verified, background_check_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(skills)
        .bind(location)
        .bind(experience_years)
        .bind(max_capacity)
        .bind(approval_status)
        .bind(id_verified)
        .bind(skills_verified)
        .bind(background_check_status)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_worker_availability(
        &self,
        user_id: Uuid,
        is_available: bool,
    ) -> Result<WorkerProfile, Error> {
        sqlx::query_as::<_, WorkerProfile>(
            r#"
            UPDATE worker_profiles
            SET is_available = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(is_available)
        .fetch_one(&self.pool)
        .await
    }

    async fn recompute_current_jobs(&self, user_id: Uuid) -> Result<i32, Error> {
        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE worker_profiles
            SET current_jobs = (
                SELECT COUNT(*)::INT FROM bookings
                WHERE employee_id = $1
                  AND status IN ('assigned', 'accepted', 'reached', 'in_progress')
                  AND is_deleted = FALSE
            ),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING current_jobs
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }
}
