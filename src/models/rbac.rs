// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Papéis (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "library_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin, // Dono/gestor da biblioteca
    Staff, // Operador do balcão
}

// ---
// Catálogo estático de permissões.
// ---
// O mapeamento papel -> capacidades é compilado no binário, nunca lido
// do banco: o banco guarda apenas o papel do usuário em cada biblioteca.

pub const PERM_LIBRARY_MANAGE: &str = "library:manage";
pub const PERM_STUDENTS_READ: &str = "students:read";
pub const PERM_STUDENTS_WRITE: &str = "students:write";
pub const PERM_SUBSCRIPTIONS_READ: &str = "subscriptions:read";
pub const PERM_SUBSCRIPTIONS_WRITE: &str = "subscriptions:write";
pub const PERM_PAYMENTS_READ: &str = "payments:read";
pub const PERM_PAYMENTS_WRITE: &str = "payments:write";
pub const PERM_EXPENSES_READ: &str = "expenses:read";
pub const PERM_EXPENSES_WRITE: &str = "expenses:write";

const ADMIN_PERMISSIONS: &[&str] = &[
    PERM_LIBRARY_MANAGE,
    PERM_STUDENTS_READ,
    PERM_STUDENTS_WRITE,
    PERM_SUBSCRIPTIONS_READ,
    PERM_SUBSCRIPTIONS_WRITE,
    PERM_PAYMENTS_READ,
    PERM_PAYMENTS_WRITE,
    PERM_EXPENSES_READ,
    PERM_EXPENSES_WRITE,
];

// O Staff opera o balcão (matrículas, pagamentos, despesas),
// mas não administra a biblioteca em si.
const STAFF_PERMISSIONS: &[&str] = &[
    PERM_STUDENTS_READ,
    PERM_STUDENTS_WRITE,
    PERM_SUBSCRIPTIONS_READ,
    PERM_SUBSCRIPTIONS_WRITE,
    PERM_PAYMENTS_READ,
    PERM_PAYMENTS_WRITE,
    PERM_EXPENSES_READ,
    PERM_EXPENSES_WRITE,
];

impl Role {
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => ADMIN_PERMISSIONS,
            Role::Staff => STAFF_PERMISSIONS,
        }
    }

    pub fn has_permission(&self, slug: &str) -> bool {
        self.permissions().contains(&slug)
    }
}

// Item do catálogo exposto em GET /api/permissions
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionInfo {
    #[schema(example = "subscriptions:write")]
    pub slug: &'static str,
    pub description: &'static str,
}

pub fn permission_catalog() -> Vec<PermissionInfo> {
    vec![
        PermissionInfo { slug: PERM_LIBRARY_MANAGE, description: "Gerir a biblioteca (turnos, assentos, membros)" },
        PermissionInfo { slug: PERM_STUDENTS_READ, description: "Ver alunos" },
        PermissionInfo { slug: PERM_STUDENTS_WRITE, description: "Criar e alterar alunos" },
        PermissionInfo { slug: PERM_SUBSCRIPTIONS_READ, description: "Ver assinaturas" },
        PermissionInfo { slug: PERM_SUBSCRIPTIONS_WRITE, description: "Matricular, renovar, cancelar e encerrar assinaturas" },
        PermissionInfo { slug: PERM_PAYMENTS_READ, description: "Ver pagamentos" },
        PermissionInfo { slug: PERM_PAYMENTS_WRITE, description: "Registrar pagamentos" },
        PermissionInfo { slug: PERM_EXPENSES_READ, description: "Ver despesas" },
        PermissionInfo { slug: PERM_EXPENSES_WRITE, description: "Registrar despesas" },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_tem_todas_as_permissoes_do_catalogo() {
        for perm in permission_catalog() {
            assert!(Role::Admin.has_permission(perm.slug), "Admin sem {}", perm.slug);
        }
    }

    #[test]
    fn staff_nao_administra_a_biblioteca() {
        assert!(!Role::Staff.has_permission(PERM_LIBRARY_MANAGE));
        assert!(Role::Staff.has_permission(PERM_SUBSCRIPTIONS_WRITE));
    }
}
