// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

// O extrator do contexto de tenant.
// Ele armazena o UUID da biblioteca que o usuário quer acessar, já
// validado pelo library_guard (cabeçalho x-library-id + checagem de
// pertencimento). Usá-lo numa rota sem o guard rejeita a requisição.
#[derive(Debug, Clone)]
pub struct LibraryContext(pub Uuid);

impl<S> FromRequestParts<S> for LibraryContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LibraryContext>()
            .cloned()
            .ok_or(AppError::MissingLibraryHeader)
    }
}
