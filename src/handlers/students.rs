// src/handlers/students.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PermStudentsRead, PermStudentsWrite, RequirePermission},
        tenancy::LibraryContext,
    },
    models::student::{Student, StudentStatus},
};

// GET /api/students
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    responses(
        (status = 200, description = "Alunos da biblioteca", body = Vec<Student>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_students(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermStudentsRead>,
) -> Result<impl IntoResponse, AppError> {
    let students = app_state
        .student_repo
        .list_students(&app_state.db_pool, library.0)
        .await?;

    Ok((StatusCode::OK, Json(students)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentStatusPayload {
    pub status: StudentStatus,
}

// PATCH /api/students/{id}/status
#[utoipa::path(
    patch,
    path = "/api/students/{id}/status",
    tag = "Students",
    request_body = UpdateStudentStatusPayload,
    responses(
        (status = 200, description = "Status do aluno atualizado", body = Student),
        (status = 404, description = "Aluno não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do aluno"),
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_student_status(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermStudentsWrite>,
    Path(student_id): Path<Uuid>,
    Json(payload): Json<UpdateStudentStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let student = app_state
        .student_repo
        .update_status(&app_state.db_pool, library.0, student_id, payload.status)
        .await?
        .ok_or(AppError::StudentNotFound)?;

    Ok((StatusCode::OK, Json(student)))
}
