// service/pricing_service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    db::{db::DBClient, promodb::PromoExt},
    models::promomodel::PromoCode,
    service::error::ServiceError,
};

/// Authoritative totals for a booking, always derived server-side from the
/// component prices. Client-submitted totals are never trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingTotals {
    pub subtotal: i64,
    pub discount_amount: i64,
    pub wallet_amount: i64,
    pub total_price: i64,
}

#[derive(Debug, Clone)]
pub struct PricingService {
    db_client: Arc<DBClient>,
}

impl PricingService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Look up and validate a promo against the order subtotal. Returns the
    /// record; the caller derives the discount and the usage increment
    /// happens separately at booking commit.
    pub async fn resolve_promo(
        &self,
        code: &str,
        subtotal: i64,
    ) -> Result<PromoCode, ServiceError> {
        let promo = self
            .db_client
            .get_promo_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::InvalidPromoCode(code.to_uppercase()))?;

        validate_promo(&promo, subtotal, Utc::now())?;
        Ok(promo)
    }

    /// Compute the settlement totals. `discount` is whatever the promo (or an
    /// admin-granted concession) resolved to; `wallet` is the customer's
    /// requested wallet contribution.
    pub fn compute_total(
        &self,
        base_price: i64,
        addon_price: i64,
        discount: i64,
        wallet: i64,
    ) -> Result<BookingTotals, ServiceError> {
        compute_total(base_price, addon_price, discount, wallet)
    }
}

pub fn validate_promo(
    promo: &PromoCode,
    subtotal: i64,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    if !promo.is_active {
        return Err(ServiceError::InvalidPromoCode(promo.code.clone()));
    }
    if let Some(valid_from) = promo.valid_from {
        if now < valid_from {
            return Err(ServiceError::PromoNotYetValid(promo.code.clone()));
        }
    }
    if let Some(valid_until) = promo.valid_until {
        if now > valid_until {
            return Err(ServiceError::PromoExpired(promo.code.clone()));
        }
    }
    if subtotal < promo.min_order_value {
        return Err(ServiceError::PromoMinOrderValue {
            required: promo.min_order_value,
        });
    }
    if promo.usage_exhausted() {
        return Err(ServiceError::PromoUsageLimitExceeded(promo.code.clone()));
    }
    Ok(())
}

pub fn compute_total(
    base_price: i64,
    addon_price: i64,
    discount: i64,
    wallet: i64,
) -> Result<BookingTotals, ServiceError> {
    let subtotal = (base_price + addon_price - discount).max(0);

    if wallet > subtotal {
        return Err(ServiceError::InvalidWalletAmount);
    }

    Ok(BookingTotals {
        subtotal,
        discount_amount: discount,
        wallet_amount: wallet,
        total_price: (subtotal - wallet).max(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::promomodel::DiscountType;
    use chrono::Duration;
    use uuid::Uuid;

    fn promo() -> PromoCode {
        PromoCode {
            id: Uuid::new_v4(),
            code: "MONSOON20".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 20,
            max_discount: Some(15_000),
            min_order_value: 50_000,
            valid_from: None,
            valid_until: None,
            is_active: true,
            usage_count: 0,
            max_usage: Some(100),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn total_identity_holds() {
        let t = compute_total(100_000, 20_000, 30_000, 40_000).unwrap();
        assert_eq!(t.subtotal, 90_000);
        assert_eq!(t.total_price, 50_000);
        // total == max(0, base+addon-discount) - wallet, and never negative
        assert!(t.total_price >= 0);
    }

    #[test]
    fn oversized_discount_floors_subtotal_at_zero() {
        let t = compute_total(10_000, 0, 50_000, 0).unwrap();
        assert_eq!(t.subtotal, 0);
        assert_eq!(t.total_price, 0);
    }

    #[test]
    fn wallet_above_subtotal_is_rejected() {
        let err = compute_total(10_000, 0, 0, 10_001).unwrap_err();
        assert_eq!(err.code(), "invalid_wallet_amount");

        // Exactly covering the subtotal is fine.
        let t = compute_total(10_000, 0, 0, 10_000).unwrap();
        assert_eq!(t.total_price, 0);
    }

    #[test]
    fn inactive_promo_is_invalid() {
        let mut p = promo();
        p.is_active = false;
        let err = validate_promo(&p, 100_000, Utc::now()).unwrap_err();
        assert_eq!(err.code(), "invalid_promo_code");
    }

    #[test]
    fn promo_window_is_enforced_on_both_ends() {
        let now = Utc::now();

        let mut p = promo();
        p.valid_from = Some(now + Duration::hours(1));
        assert_eq!(
            validate_promo(&p, 100_000, now).unwrap_err().code(),
            "promo_not_yet_valid"
        );

        let mut p = promo();
        p.valid_until = Some(now - Duration::hours(1));
        assert_eq!(
            validate_promo(&p, 100_000, now).unwrap_err().code(),
            "promo_expired"
        );
    }

    #[test]
    fn promo_minimum_order_value_is_enforced() {
        let p = promo();
        assert_eq!(
            validate_promo(&p, 49_999, Utc::now()).unwrap_err().code(),
            "promo_min_order_value"
        );
        assert!(validate_promo(&p, 50_000, Utc::now()).is_ok());
    }

    #[test]
    fn exhausted_promo_is_rejected() {
        let mut p = promo();
        p.usage_count = 100;
        assert_eq!(
            validate_promo(&p, 100_000, Utc::now()).unwrap_err().code(),
            "promo_usage_limit_exceeded"
        );
    }
}
