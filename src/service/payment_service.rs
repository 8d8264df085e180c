// service/payment_service.rs
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{config::Config, service::error::ServiceError};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub booking_id: Uuid,
}

/// Thin client for the online-payment gateway. Order creation is keyed by
/// booking id and amount; confirmation is an HMAC signature check over the
/// gateway's order/payment pair.
pub struct PaymentService {
    gateway_url: String,
    key_id: String,
    key_secret: String,
    http: reqwest::Client,
}

impl PaymentService {
    pub fn new(config: &Config) -> Self {
        Self {
            gateway_url: config.payment_gateway_url.clone(),
            key_id: config.payment_key_id.clone(),
            key_secret: config.payment_key_secret.clone(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn create_order(
        &self,
        booking_id: Uuid,
        amount: i64,
    ) -> Result<GatewayOrder, ServiceError> {
        let payload = serde_json::json!({
            "amount": amount,
            "currency": "INR",
            "receipt": booking_id.to_string(),
        });

        let response = self
            .http
            .post(format!("{}/orders", self.gateway_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ServiceError::PaymentGateway(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::PaymentGateway(format!(
                "order creation returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ServiceError::PaymentGateway(e.to_string()))?;

        let order_id = body["id"]
            .as_str()
            .ok_or_else(|| ServiceError::PaymentGateway("order id missing in response".to_string()))?
            .to_string();

        Ok(GatewayOrder {
            order_id,
            amount,
            currency: "INR".to_string(),
            booking_id,
        })
    }

    /// Confirm a gateway callback: signature = HMAC-SHA256(order_id|payment_id)
    /// under the key secret, hex-encoded. Compared in constant time.
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), ServiceError> {
        let expected = sign_payment(&self.key_secret, order_id, payment_id);

        let matches: bool = expected
            .as_bytes()
            .ct_eq(signature.trim().to_lowercase().as_bytes())
            .into();

        if matches {
            Ok(())
        } else {
            Err(ServiceError::PaymentSignatureInvalid)
        }
    }
}

impl std::fmt::Debug for PaymentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentService")
            .field("gateway_url", &self.gateway_url)
            .field("key_id", &self.key_id)
            .finish()
    }
}

fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PaymentService {
        PaymentService {
            gateway_url: "https://gateway.test".to_string(),
            key_id: "key".to_string(),
            key_secret: "secret".to_string(),
            http: reqwest::Client::new(),
        }
    }

    #[test]
    fn valid_signature_verifies() {
        let svc = service();
        let sig = sign_payment("secret", "order_1", "pay_1");
        assert!(svc.verify_signature("order_1", "pay_1", &sig).is_ok());
    }

    #[test]
    fn tampered_fields_fail_verification() {
        let svc = service();
        let sig = sign_payment("secret", "order_1", "pay_1");
        assert!(svc.verify_signature("order_2", "pay_1", &sig).is_err());
        assert!(svc.verify_signature("order_1", "pay_2", &sig).is_err());
        assert!(svc.verify_signature("order_1", "pay_1", "deadbeef").is_err());
    }

    #[test]
    fn signature_comparison_ignores_case_and_whitespace() {
        let svc = service();
        let sig = sign_payment("secret", "order_1", "pay_1").to_uppercase();
        assert!(svc.verify_signature("order_1", "pay_1", &format!(" {} ", sig)).is_ok());
    }
}
