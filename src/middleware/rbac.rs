// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::rbac, models::rbac::Role};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
///
/// O papel do usuário na biblioteca vem dos extensions (inserido pelo
/// library_guard); o mapeamento papel -> capacidades é estático, compilado
/// no binário. Nada de strings de rota vindas do banco.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = parts
            .extensions
            .get::<Role>()
            .copied()
            .ok_or(AppError::MissingLibraryHeader)?;

        let required_perm = T::slug();
        if !role.has_permission(required_perm) {
            return Err(AppError::MissingPermission(required_perm.to_string()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermLibraryManage;
impl PermissionDef for PermLibraryManage {
    fn slug() -> &'static str {
        rbac::PERM_LIBRARY_MANAGE
    }
}

pub struct PermStudentsRead;
impl PermissionDef for PermStudentsRead {
    fn slug() -> &'static str {
        rbac::PERM_STUDENTS_READ
    }
}

pub struct PermStudentsWrite;
impl PermissionDef for PermStudentsWrite {
    fn slug() -> &'static str {
        rbac::PERM_STUDENTS_WRITE
    }
}

pub struct PermSubscriptionsRead;
impl PermissionDef for PermSubscriptionsRead {
    fn slug() -> &'static str {
        rbac::PERM_SUBSCRIPTIONS_READ
    }
}

pub struct PermSubscriptionsWrite;
impl PermissionDef for PermSubscriptionsWrite {
    fn slug() -> &'static str {
        rbac::PERM_SUBSCRIPTIONS_WRITE
    }
}

pub struct PermPaymentsRead;
impl PermissionDef for PermPaymentsRead {
    fn slug() -> &'static str {
        rbac::PERM_PAYMENTS_READ
    }
}

pub struct PermPaymentsWrite;
impl PermissionDef for PermPaymentsWrite {
    fn slug() -> &'static str {
        rbac::PERM_PAYMENTS_WRITE
    }
}

pub struct PermExpensesRead;
impl PermissionDef for PermExpensesRead {
    fn slug() -> &'static str {
        rbac::PERM_EXPENSES_READ
    }
}

pub struct PermExpensesWrite;
impl PermissionDef for PermExpensesWrite {
    fn slug() -> &'static str {
        rbac::PERM_EXPENSES_WRITE
    }
}
