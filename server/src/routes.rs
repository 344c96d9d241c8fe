use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sharecab::ShareCabError;
use sharecab::notifier::Notification;
use sharecab::types::{
    BookingRequest, BookingResponse, CallSession, ChatMessage, Driver, PaymentRequest,
    PaymentResponse, ReportRequest, ReportResponse, RideSession, RideStatus,
};
use sharecab::validation::{validate_booking, validate_payment};

use crate::error::ApiResult;
use crate::rides::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequest {
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpResponse {
    pub verified: bool,
    pub status: RideStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/rides", post(book_ride))
        .route("/api/drivers/{id}", get(get_driver))
        .route("/api/drivers/{id}/report", post(report_driver))
        .route("/api/payments", post(process_payment))
        .route(
            "/api/rides/{id}/tracking",
            get(get_tracking).post(start_tracking).delete(stop_tracking),
        )
        .route("/api/rides/{id}/otp", post(verify_otp))
        .route("/api/rides/{id}/finish", post(finish_ride))
        .route("/api/rides/{id}/notifications", get(drain_notifications))
        .route("/api/rides/{id}/chat", get(get_chat).post(send_chat))
        .route(
            "/api/rides/{id}/call",
            get(get_call).post(open_call).delete(end_call),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn book_ride(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    validate_booking(&request)?;
    Ok(Json(state.api.book_ride(&request).await))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Driver>> {
    let driver = state
        .api
        .get_driver(&id)
        .await
        .ok_or_else(|| ShareCabError::NotFound(format!("Driver {id}")))?;
    Ok(Json(driver))
}

async fn report_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReportRequest>,
) -> ApiResult<Json<ReportResponse>> {
    if request.reason.trim().is_empty() {
        return Err(ShareCabError::Validation("Report reason is required".to_string()).into());
    }
    Ok(Json(state.api.report_driver(&id, request.reason.trim()).await))
}

async fn process_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<Json<PaymentResponse>> {
    validate_payment(&request)?;
    Ok(Json(state.api.process_payment(&request).await))
}

async fn start_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<RideSession>)> {
    let session = state.start_tracking(&id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RideSession>> {
    let page = state.page(&id).await?;
    let session = page.lock().await.tracker.snapshot();
    Ok(Json(session))
}

async fn stop_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.stop_tracking(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn verify_otp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<OtpRequest>,
) -> ApiResult<Json<OtpResponse>> {
    let page = state.page(&id).await?;
    let page = page.lock().await;

    let verified = page.tracker.verify_otp(&request.otp).await?;
    Ok(Json(OtpResponse {
        verified,
        status: page.tracker.snapshot().status,
    }))
}

async fn finish_ride(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RideSession>> {
    let page = state.page(&id).await?;
    let page = page.lock().await;

    page.tracker.finish_ride().await?;
    Ok(Json(page.tracker.snapshot()))
}

async fn drain_notifications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Notification>>> {
    let page = state.page(&id).await?;
    let notifications = page.lock().await.drain_notifications();
    Ok(Json(notifications))
}

async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let page = state.page(&id).await?;
    let messages = page.lock().await.chat.messages();
    Ok(Json(messages))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<(StatusCode, Json<Vec<ChatMessage>>)> {
    let page = state.page(&id).await?;
    let mut page = page.lock().await;

    if !page.chat.send(&request.text) {
        return Err(ShareCabError::Validation("Message cannot be empty".to_string()).into());
    }
    Ok((StatusCode::CREATED, Json(page.chat.messages())))
}

async fn get_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CallSession>> {
    let page = state.page(&id).await?;
    let call = page.lock().await.call.snapshot();
    Ok(Json(call))
}

async fn open_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CallSession>> {
    let page = state.page(&id).await?;
    let mut page = page.lock().await;

    page.call.open();
    Ok(Json(page.call.snapshot()))
}

async fn end_call(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CallSession>> {
    let page = state.page(&id).await?;
    let mut page = page.lock().await;

    page.call.end();
    Ok(Json(page.call.snapshot()))
}
