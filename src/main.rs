mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    booking_service::BookingService,
    matching_service::MatchingService,
    notification_service::NotificationService,
    otp_service::OtpService,
    payment_service::PaymentService,
    pricing_service::PricingService,
    slot_service::SlotService,
    wallet_service::WalletService,
};

#[derive(Debug)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub otp_service: Arc<OtpService>,
    pub pricing_service: Arc<PricingService>,
    pub wallet_service: Arc<WalletService>,
    pub slot_service: Arc<SlotService>,
    pub matching_service: Arc<MatchingService>,
    pub booking_service: Arc<BookingService>,
    pub notification_service: Arc<NotificationService>,
    pub payment_service: Arc<PaymentService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let notification_service = Arc::new(NotificationService::new(
            db_client_arc.clone(),
            config.clone(),
        ));
        let otp_service = Arc::new(OtpService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let pricing_service = Arc::new(PricingService::new(db_client_arc.clone()));
        let wallet_service = Arc::new(WalletService::new(db_client_arc.clone()));
        let slot_service = Arc::new(SlotService::new(db_client_arc.clone()));
        let matching_service = Arc::new(MatchingService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let payment_service = Arc::new(PaymentService::new(&config));

        let booking_service = Arc::new(BookingService::new(
            db_client_arc.clone(),
            pricing_service.clone(),
            wallet_service.clone(),
            slot_service.clone(),
            notification_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            otp_service,
            pricing_service,
            wallet_service,
            slot_service,
            matching_service,
            booking_service,
            notification_service,
            payment_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = db::migrations::run_migrations(&pool).await {
        tracing::error!("Failed to run migrations: {:?}", err);
        std::process::exit(1);
    }

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        config.app_url.parse::<HeaderValue>().expect("APP_URL must be a valid origin"),
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    // Hourly reaper for expired OTP challenges.
    app_state.otp_service.start_cleanup_task();

    // Sweep pending bookings onto eligible workers.
    tokio::spawn(service::background_jobs::start_auto_assign_job(app_state.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
