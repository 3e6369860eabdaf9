// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::LibraryContext,
    models::auth::User,
};

// O nome do nosso cabeçalho HTTP customizado de tenant
const LIBRARY_ID_HEADER: &str = "x-library-id";

async fn authenticate(app_state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return app_state.auth_service.validate_token(token).await;
        }
    }

    Err(AppError::InvalidToken)
}

/// Guarda de autenticação: valida o JWT e insere o usuário nos
/// "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&app_state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Guarda de tenant: autentica E verifica que o usuário é membro da
/// biblioteca indicada no cabeçalho x-library-id. Quem não é membro
/// recebe 404 (nunca 403), para não vazar a existência da biblioteca.
pub async fn library_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&app_state, request.headers()).await?;

    let library_id: Uuid = request
        .headers()
        .get(LIBRARY_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(AppError::MissingLibraryHeader)?;

    let role = app_state
        .library_repo
        .find_membership_role(user.id, library_id)
        .await?
        .ok_or(AppError::LibraryNotFound)?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(LibraryContext(library_id));
    request.extensions_mut().insert(role);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
