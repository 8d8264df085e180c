// handler/admin.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{delete, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{promodb::PromoExt, slotdb::SlotExt, userdb::UserExt, workerdb::WorkerExt},
    dtos::{
        bookingdtos::AssignWorkerDto,
        promodtos::{CreatePromoDto, UpdatePromoDto},
        slotdtos::{CreateSlotDto, ListSlotsQuery},
        workerdtos::{CreateWorkerDto, CreditWalletDto},
        ApiResponse,
    },
    error::HttpError,
    models::usermodel::UserRole,
    AppState,
};

/// Admin back-office surface, gated by the X-Admin-Key middleware in
/// routes.rs. The admin booking mutations live on the bookings router so the
/// paths match the public API shape.
pub fn admin_handler() -> Router {
    Router::new()
        .route("/bookings/:booking_id", delete(delete_booking))
        .route("/slots", post(create_slot).get(list_slots))
        .route("/promos", post(create_promo).get(list_promos))
        .route("/promos/:code", patch(update_promo))
        .route("/workers", post(create_worker))
        .route("/wallets/credit", post(credit_wallet))
}

/// Assignment endpoints keep the public /bookings path shape but are admin
/// actions, so they carry the admin-key layer instead of JWT auth.
pub fn admin_booking_handler() -> Router {
    Router::new()
        .route("/:booking_id/auto-assign", patch(auto_assign_booking))
        .route("/:booking_id/assign", patch(assign_booking))
}

pub async fn auto_assign_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state.matching_service.auto_assign(booking_id).await?;

    Ok(Json(ApiResponse::success("Worker auto-assigned", booking)))
}

pub async fn assign_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<AssignWorkerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .matching_service
        .manual_assign(booking_id, body.employee_id)
        .await?;

    Ok(Json(ApiResponse::success("Worker assigned", booking)))
}

pub async fn delete_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.booking_service.delete_booking(booking_id).await?;

    Ok(Json(ApiResponse::success("Booking deleted", serde_json::json!({}))))
}

pub async fn create_slot(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateSlotDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let slot = app_state
        .db_client
        .create_slot(body.service_id, body.date, body.time_slot, body.total_capacity)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Slot saved", slot)))
}

pub async fn list_slots(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ListSlotsQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let slots = app_state
        .db_client
        .list_slots(query.date)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Slots retrieved", slots)))
}

pub async fn create_promo(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreatePromoDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let promo = app_state
        .db_client
        .create_promo(
            body.code,
            body.discount_type,
            body.discount_value,
            body.max_discount,
            body.min_order_value,
            body.valid_from,
            body.valid_until,
            body.max_usage,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Promo code created", promo)))
}

pub async fn list_promos(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let promos = app_state
        .db_client
        .list_promos()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success("Promo codes retrieved", promos)))
}

pub async fn update_promo(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(code): Path<String>,
    Json(body): Json<UpdatePromoDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let promo = app_state
        .db_client
        .update_promo(&code, body.is_active, body.max_usage, body.valid_until)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Promo code not found"))?;

    Ok(Json(ApiResponse::success("Promo code updated", promo)))
}

/// Onboard a worker: user row plus a matching profile with the verification
/// flags the operator has already checked offline.
pub async fn create_worker(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateWorkerDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_user_by_phone(&body.phone)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_some() {
        return Err(HttpError::bad_request("Phone number already registered"));
    }

    let user = app_state
        .db_client
        .create_user(&body.phone, Some(body.full_name), None, UserRole::Worker)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let profile = app_state
        .db_client
        .create_worker_profile(
            user.id,
            body.skills,
            body.location,
            body.experience_years,
            body.max_capacity,
            body.approval_status,
            body.id_verified,
            body.skills_verified,
            body.background_check_status,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Worker created",
        serde_json::json!({ "user": user, "profile": profile }),
    )))
}

/// Promotional or goodwill wallet top-up.
pub async fn credit_wallet(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreditWalletDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let balance = app_state
        .wallet_service
        .credit(body.user_id, body.amount, body.description, None)
        .await?;

    Ok(Json(ApiResponse::success(
        "Wallet credited",
        serde_json::json!({ "user_id": body.user_id, "balance": balance }),
    )))
}
