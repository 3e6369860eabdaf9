// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::subscription::SubscriptionStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Taxonomia: validação (400), conflito (409), não-encontrado (404),
// estado inválido (422), auth (401/403) e o resto vira 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão insuficiente: {0}")]
    MissingPermission(String),

    #[error("Cabeçalho x-library-id ausente ou inválido")]
    MissingLibraryHeader,

    #[error("Parâmetro shiftIds inválido")]
    InvalidShiftIds,

    // --- Não-encontrado ---
    // Referência a outro tenant também cai aqui: respondemos 404 (nunca 403)
    // para não vazar a existência de dados entre bibliotecas.
    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Biblioteca não encontrada")]
    LibraryNotFound,

    #[error("Aluno não encontrado")]
    StudentNotFound,

    #[error("Assento não encontrado")]
    SeatNotFound,

    #[error("Turno não encontrado")]
    ShiftNotFound,

    #[error("Assinatura não encontrada")]
    SubscriptionNotFound,

    // --- Conflitos ---
    // Detectados na escrita, mesmo depois de uma leitura dizer "livre".
    // O assento em disputa é seguro de tentar de novo com OUTRO assento.
    #[error("Assento já ocupado neste turno")]
    SeatAlreadyOccupied,

    #[error("O aluno já possui uma assinatura ativa")]
    ActiveSubscriptionExists,

    // --- Estado inválido (transições de mão única) ---
    #[error("A assinatura não está ativa (status atual: {0:?})")]
    InvalidSubscriptionState(SubscriptionStatus),

    #[error("O aluno não possui assinatura ativa para renovar")]
    NoActiveSubscription,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::MissingPermission(slug) => (
                StatusCode::FORBIDDEN,
                format!("Você precisa da permissão '{}' para realizar esta ação.", slug),
            ),
            AppError::MissingLibraryHeader => (
                StatusCode::BAD_REQUEST,
                "O cabeçalho x-library-id é obrigatório e deve ser um UUID.".to_string(),
            ),
            AppError::InvalidShiftIds => (
                StatusCode::BAD_REQUEST,
                "O parâmetro shiftIds deve ser uma lista de UUIDs separados por vírgula.".to_string(),
            ),

            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::LibraryNotFound => {
                (StatusCode::NOT_FOUND, "Biblioteca não encontrada.".to_string())
            }
            AppError::StudentNotFound => {
                (StatusCode::NOT_FOUND, "Aluno não encontrado.".to_string())
            }
            AppError::SeatNotFound => {
                (StatusCode::NOT_FOUND, "Assento não encontrado.".to_string())
            }
            AppError::ShiftNotFound => {
                (StatusCode::NOT_FOUND, "Turno não encontrado.".to_string())
            }
            AppError::SubscriptionNotFound => {
                (StatusCode::NOT_FOUND, "Assinatura não encontrada.".to_string())
            }

            // Conflito distinto da validação genérica: a UI deve sugerir
            // escolher outro assento.
            AppError::SeatAlreadyOccupied => (
                StatusCode::CONFLICT,
                "Este assento já está ocupado em um dos turnos escolhidos.".to_string(),
            ),
            AppError::ActiveSubscriptionExists => (
                StatusCode::CONFLICT,
                "O aluno já possui uma assinatura ativa.".to_string(),
            ),

            AppError::InvalidSubscriptionState(status) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("A assinatura não está ativa (status atual: {:?}).", status),
            ),
            AppError::NoActiveSubscription => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "O aluno não possui assinatura ativa para renovar.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo opaco.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
