// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    pub admin_api_key: String,
    // SMS gateway (OTP delivery and booking updates)
    pub sms_gateway_url: String,
    pub sms_gateway_key: String,
    // Transactional mail API
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    // Payment gateway (online bookings)
    pub payment_gateway_url: String,
    pub payment_key_id: String,
    pub payment_key_secret: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let admin_api_key = std::env::var("ADMIN_API_KEY").expect("ADMIN_API_KEY must be set");
        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        // Delivery and payment providers (with test defaults)
        let sms_gateway_url = std::env::var("SMS_GATEWAY_URL")
            .unwrap_or_else(|_| "https://api.sms-gateway.local/v1/messages".to_string());
        let sms_gateway_key = std::env::var("SMS_GATEWAY_KEY")
            .unwrap_or_else(|_| "test_sms_key".to_string());
        let mail_api_url = std::env::var("MAIL_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com/emails".to_string());
        let mail_api_key = std::env::var("MAIL_API_KEY")
            .unwrap_or_else(|_| "".to_string());
        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "HomeServe <noreply@homeserve.local>".to_string());
        let payment_gateway_url = std::env::var("PAYMENT_GATEWAY_URL")
            .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string());
        let payment_key_id = std::env::var("PAYMENT_KEY_ID")
            .unwrap_or_else(|_| "test_key_id".to_string());
        let payment_key_secret = std::env::var("PAYMENT_KEY_SECRET")
            .unwrap_or_else(|_| "test_key_secret".to_string());

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port,
            admin_api_key,
            sms_gateway_url,
            sms_gateway_key,
            mail_api_url,
            mail_api_key,
            mail_from,
            payment_gateway_url,
            payment_key_id,
            payment_key_secret,
        }
    }
}
