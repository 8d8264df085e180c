// models/workermodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "approval_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub approval_status: ApprovalStatus,
    pub id_verified: bool,
    pub skills_verified: bool,
    pub background_check_status: ApprovalStatus,
    pub is_available: bool,
    /// Service ids this worker covers. Empty means "any service".
    pub skills: Vec<Uuid>,
    pub location: String,
    pub rating: f32,
    pub experience_years: i32,
    pub max_capacity: i32,
    /// Derived: count of this worker's bookings in an active status.
    /// Recomputed after every assignment and status change, never mutated
    /// independently.
    pub current_jobs: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkerProfile {
    /// The verification predicate alone. Manual (admin) assignment checks only
    /// this; availability and load are the admin's call.
    pub fn is_verified(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
            && self.id_verified
            && self.skills_verified
            && self.background_check_status == ApprovalStatus::Approved
    }

    pub fn has_skill(&self, service_id: Uuid) -> bool {
        self.skills.is_empty() || self.skills.contains(&service_id)
    }

    /// Full eligibility for auto-assignment.
    pub fn is_eligible_for(&self, service_id: Uuid) -> bool {
        self.is_verified()
            && self.is_available
            && self.current_jobs < self.max_capacity
            && self.has_skill(service_id)
    }

    /// Weighted linear ranking: location match dominates, then rating,
    /// experience, and remaining slack capacity as tie-breaker.
    pub fn priority_score(&self, customer_location: &str) -> f64 {
        let location_match = if self.location.eq_ignore_ascii_case(customer_location) {
            100.0
        } else {
            0.0
        };
        let slack = (self.max_capacity - self.current_jobs).max(0) as f64;

        location_match
            + 10.0 * self.rating as f64
            + 5.0 * self.experience_years as f64
            + 2.0 * slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(location: &str, rating: f32, experience: i32) -> WorkerProfile {
        WorkerProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            approval_status: ApprovalStatus::Approved,
            id_verified: true,
            skills_verified: true,
            background_check_status: ApprovalStatus::Approved,
            is_available: true,
            skills: vec![],
            location: location.to_string(),
            rating,
            experience_years: experience,
            max_capacity: 5,
            current_jobs: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn location_match_dominates_rating() {
        // A (location match, rating 4) must outrank B (no match, rating 5)
        // with everything else equal.
        let a = worker("indiranagar", 4.0, 0);
        let b = worker("whitefield", 5.0, 0);
        assert!(a.priority_score("indiranagar") > b.priority_score("indiranagar"));
    }

    #[test]
    fn slack_breaks_ties_toward_less_loaded_workers() {
        let mut a = worker("hsr", 4.5, 3);
        let mut b = worker("hsr", 4.5, 3);
        a.current_jobs = 1;
        b.current_jobs = 4;
        assert!(a.priority_score("hsr") > b.priority_score("hsr"));
    }

    #[test]
    fn unverified_worker_is_not_eligible() {
        let service = Uuid::new_v4();
        let mut w = worker("hsr", 5.0, 4);
        w.id_verified = false;
        assert!(!w.is_eligible_for(service));
        assert!(!w.is_verified());
    }

    #[test]
    fn full_capacity_blocks_eligibility_but_not_verification() {
        let service = Uuid::new_v4();
        let mut w = worker("hsr", 5.0, 4);
        w.current_jobs = w.max_capacity;
        assert!(w.is_verified());
        assert!(!w.is_eligible_for(service));
    }

    #[test]
    fn empty_skill_set_matches_any_service() {
        let service = Uuid::new_v4();
        let mut w = worker("hsr", 5.0, 4);
        assert!(w.is_eligible_for(service));

        w.skills = vec![Uuid::new_v4()];
        assert!(!w.is_eligible_for(service));

        w.skills.push(service);
        assert!(w.is_eligible_for(service));
    }
}
