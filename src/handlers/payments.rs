// src/handlers/payments.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermPaymentsRead, PermPaymentsWrite, RequirePermission},
        tenancy::LibraryContext,
    },
    models::subscription::{Payment, PaymentMode},
};

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser positivo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub subscription_id: Uuid,

    #[validate(custom(function = validate_positive))]
    #[schema(example = "300.00")]
    pub amount: Decimal,

    pub payment_mode: PaymentMode,

    // Se omitida, vale a data de hoje
    #[schema(value_type = Option<String>, format = Date, example = "2026-02-15")]
    pub payment_date: Option<NaiveDate>,
}

// POST /api/payments
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "Payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado; paid/pending recomputados", body = Payment),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Assinatura não encontrada")
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    library: LibraryContext,
    _perm: RequirePermission<PermPaymentsWrite>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let payment_date = payload.payment_date.unwrap_or_else(|| Utc::now().date_naive());

    let payment = app_state
        .ledger_service
        .add_payment(
            user.id,
            library.0,
            payload.subscription_id,
            payload.amount,
            payload.payment_mode,
            payment_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/payments
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    responses(
        (status = 200, description = "Pagamentos da biblioteca", body = Vec<Payment>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermPaymentsRead>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state
        .payment_repo
        .list_payments(&app_state.db_pool, library.0)
        .await?;

    Ok((StatusCode::OK, Json(payments)))
}
