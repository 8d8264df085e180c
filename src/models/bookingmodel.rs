// models/bookingmodel.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Assigned,
    Accepted,
    Reached,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Assigned => "assigned",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Reached => "reached",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Statuses that count toward a worker's load.
    pub fn is_active_assignment(&self) -> bool {
        matches!(
            self,
            BookingStatus::Assigned
                | BookingStatus::Accepted
                | BookingStatus::Reached
                | BookingStatus::InProgress
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    Assign,
    Accept,
    MarkReached,
    StartWork,
    Complete,
    Cancel,
    Reschedule,
}

impl BookingEvent {
    pub fn to_str(&self) -> &str {
        match self {
            BookingEvent::Assign => "assign",
            BookingEvent::Accept => "accept",
            BookingEvent::MarkReached => "mark_reached",
            BookingEvent::StartWork => "start_work",
            BookingEvent::Complete => "complete",
            BookingEvent::Cancel => "cancel",
            BookingEvent::Reschedule => "reschedule",
        }
    }
}

impl BookingStatus {
    /// Guard table for the lifecycle. Deliberately permissive past the first
    /// hop: field staff report out of order (a worker may mark "reached"
    /// without ever tapping "accept"), so most events are blocked only by the
    /// terminal states.
    pub fn allows(&self, event: BookingEvent) -> bool {
        use BookingStatus::*;
        match event {
            BookingEvent::Assign => matches!(self, Pending | Assigned),
            BookingEvent::Accept | BookingEvent::MarkReached | BookingEvent::StartWork => {
                !self.is_terminal()
            }
            BookingEvent::Complete => *self != Cancelled,
            BookingEvent::Cancel | BookingEvent::Reschedule => !self.is_terminal(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Pending,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Online,
    Cod,
    Wallet,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "cancelled_by", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Customer,
    Admin,
}

/// The three bookable windows of a service day, each a fixed four-hour range.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "time_slot", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub fn window(&self) -> (&'static str, &'static str) {
        match self {
            TimeSlot::Morning => ("08:00", "12:00"),
            TimeSlot::Afternoon => ("12:00", "16:00"),
            TimeSlot::Evening => ("16:00", "20:00"),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }
}

/// Capacity ledger for one (service, date, window). A missing row means the
/// window is unconstrained.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Slot {
    pub id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub total_capacity: i32,
    pub booked_count: i32,
    pub is_available: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Slot {
    pub fn has_capacity(&self) -> bool {
        self.booked_count < self.total_capacity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub status: BookingStatus,
    pub booking_date: NaiveDate,
    pub booking_time: TimeSlot,
    pub customer_address: String,
    /// Area label matched against worker locations during auto-assignment.
    pub customer_location: String,
    // All money in paise.
    pub base_price: i64,
    pub addon_price: i64,
    pub discount_amount: i64,
    pub wallet_amount: i64,
    pub platform_fee: i64,
    pub total_price: i64,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<CancelledBy>,
    pub before_photos: Vec<String>,
    pub after_photos: Vec<String>,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub reached_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingEvent::*;
    use BookingStatus::*;

    const ALL_STATUSES: [BookingStatus; 7] =
        [Pending, Assigned, Accepted, Reached, InProgress, Completed, Cancelled];

    #[test]
    fn assign_only_from_pending_or_assigned() {
        for s in ALL_STATUSES {
            assert_eq!(s.allows(Assign), matches!(s, Pending | Assigned), "{:?}", s);
        }
    }

    #[test]
    fn terminal_states_absorb_everything() {
        for event in [Assign, Accept, MarkReached, StartWork, Complete, Cancel, Reschedule] {
            assert!(!Cancelled.allows(event), "cancelled must block {:?}", event);
        }
        for event in [Assign, Accept, MarkReached, StartWork, Cancel, Reschedule] {
            assert!(!Completed.allows(event), "completed must block {:?}", event);
        }
    }

    #[test]
    fn field_events_tolerate_out_of_order_reporting() {
        // A worker may mark reached or start work straight from `assigned`
        // (or even `pending`) without an accept in between.
        for s in [Pending, Assigned, Accepted, Reached, InProgress] {
            assert!(s.allows(Accept));
            assert!(s.allows(MarkReached));
            assert!(s.allows(StartWork));
            assert!(s.allows(Complete));
        }
    }

    #[test]
    fn cancel_allowed_from_any_non_terminal_state() {
        for s in [Pending, Assigned, Accepted, Reached, InProgress] {
            assert!(s.allows(Cancel));
            assert!(s.allows(Reschedule));
        }
    }

    #[test]
    fn active_assignment_statuses_match_worker_load_definition() {
        for s in ALL_STATUSES {
            let expected = matches!(s, Assigned | Accepted | Reached | InProgress);
            assert_eq!(s.is_active_assignment(), expected, "{:?}", s);
        }
    }

    #[test]
    fn slot_capacity_boundary() {
        let mut slot = Slot {
            id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            time_slot: TimeSlot::Morning,
            total_capacity: 1,
            booked_count: 0,
            is_available: true,
            created_at: None,
            updated_at: None,
        };
        assert!(slot.has_capacity());

        slot.booked_count = 1;
        assert!(!slot.has_capacity());
    }

    #[test]
    fn time_slot_windows_are_fixed() {
        assert_eq!(TimeSlot::Morning.window(), ("08:00", "12:00"));
        assert_eq!(TimeSlot::Afternoon.window(), ("12:00", "16:00"));
        assert_eq!(TimeSlot::Evening.window(), ("16:00", "20:00"));
    }
}
