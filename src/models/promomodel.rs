// models/promomodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "discount_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PromoCode {
    pub id: Uuid,
    /// Stored uppercase; lookups normalize before comparing.
    pub code: String,
    pub discount_type: DiscountType,
    /// Percent (0-100) for percentage promos, paise for flat promos.
    pub discount_value: i64,
    pub max_discount: Option<i64>,
    pub min_order_value: i64,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub usage_count: i32,
    pub max_usage: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PromoCode {
    pub fn usage_exhausted(&self) -> bool {
        matches!(self.max_usage, Some(max) if self.usage_count >= max)
    }

    /// Discount for a given subtotal: percentage capped by max_discount,
    /// flat clamped to the subtotal. Never negative, never above subtotal.
    pub fn discount_for(&self, subtotal: i64) -> i64 {
        let raw = match self.discount_type {
            DiscountType::Percentage => subtotal * self.discount_value / 100,
            DiscountType::Flat => self.discount_value,
        };
        let capped = match (self.discount_type, self.max_discount) {
            (DiscountType::Percentage, Some(max)) => raw.min(max),
            _ => raw,
        };
        capped.clamp(0, subtotal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(discount_type: DiscountType, value: i64, max_discount: Option<i64>) -> PromoCode {
        PromoCode {
            id: Uuid::new_v4(),
            code: "FIRST50".to_string(),
            discount_type,
            discount_value: value,
            max_discount,
            min_order_value: 0,
            valid_from: None,
            valid_until: None,
            is_active: true,
            usage_count: 0,
            max_usage: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn percentage_discount_capped_by_max() {
        let p = promo(DiscountType::Percentage, 50, Some(10_000));
        assert_eq!(p.discount_for(100_000), 10_000);
        assert_eq!(p.discount_for(10_000), 5_000);
    }

    #[test]
    fn flat_discount_never_exceeds_subtotal() {
        let p = promo(DiscountType::Flat, 20_000, None);
        assert_eq!(p.discount_for(15_000), 15_000);
        assert_eq!(p.discount_for(50_000), 20_000);
    }

    #[test]
    fn usage_cap_only_applies_when_set() {
        let mut p = promo(DiscountType::Flat, 100, None);
        p.usage_count = 10_000;
        assert!(!p.usage_exhausted());

        p.max_usage = Some(10_000);
        assert!(p.usage_exhausted());

        p.max_usage = Some(10_001);
        assert!(!p.usage_exhausted());
    }
}
