// handler/auth.rs
use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    dtos::{
        authdtos::{FilterUserDto, RequestOtpDto, VerifyOtpDto, VerifyOtpResponseDto},
        Response,
    },
    error::HttpError,
    models::otpmodel::OtpPurpose,
    utils::token,
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/request-otp", post(request_otp))
        .route("/verify-otp", post(verify_otp))
}

pub async fn request_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RequestOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let purpose = body.purpose.unwrap_or(OtpPurpose::Login);

    app_state
        .otp_service
        .request_challenge(&body.phone, purpose)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(Response {
            status: "success",
            message: "OTP sent".to_string(),
        }),
    ))
}

pub async fn verify_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<VerifyOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let purpose = body.purpose.unwrap_or(OtpPurpose::Login);

    let (user, is_new_user) = app_state
        .otp_service
        .verify_challenge(&body.phone, &body.code, purpose, body.full_name, body.email)
        .await?;

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage * 60);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let needs_profile_completion = user.needs_profile_completion();

    let response = Json(VerifyOtpResponseDto {
        status: "success".to_string(),
        token,
        profile: FilterUserDto::filter_user(&user),
        is_new_user,
        needs_profile_completion,
    });

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie".to_string()))?,
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}
