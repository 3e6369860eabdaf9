// src/services/library_service.rs

use chrono::NaiveTime;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LibraryRepository,
    models::{
        library::{Library, Shift},
        rbac::Role,
        seating::Seat,
    },
};

// Definição de um turno no onboarding
#[derive(Debug, Clone)]
pub struct ShiftDef {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_hours: Decimal,
}

#[derive(Clone)]
pub struct LibraryService {
    pool: PgPool,
    library_repo: LibraryRepository,
}

impl LibraryService {
    pub fn new(pool: PgPool, library_repo: LibraryRepository) -> Self {
        Self { pool, library_repo }
    }

    /// Onboarding de uma biblioteca: cria o tenant, semeia os assentos
    /// 1..=total_seats, cria os turnos e torna o criador ADMIN, tudo em
    /// uma transação. Se qualquer passo falhar, nada fica pela metade.
    pub async fn onboard_library(
        &self,
        creator_id: Uuid,
        name: &str,
        total_seats: i32,
        shift_defs: &[ShiftDef],
    ) -> Result<(Library, Vec<Shift>), AppError> {
        let mut tx = self.pool.begin().await?;

        let library = self
            .library_repo
            .create_library(&mut *tx, name, total_seats)
            .await?;

        self.library_repo
            .seed_seats(&mut *tx, library.id, total_seats)
            .await?;

        let mut shifts = Vec::with_capacity(shift_defs.len());
        for def in shift_defs {
            let shift = self
                .library_repo
                .create_shift(
                    &mut *tx,
                    library.id,
                    &def.name,
                    def.start_time,
                    def.end_time,
                    def.total_hours,
                )
                .await?;
            shifts.push(shift);
        }

        self.library_repo
            .assign_user_to_library(&mut *tx, creator_id, library.id, Role::Admin)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🏛️ Biblioteca '{}' criada ({} assentos, {} turnos)",
            library.name,
            total_seats,
            shifts.len()
        );

        Ok((library, shifts))
    }

    pub async fn list_my_libraries(&self, user_id: Uuid) -> Result<Vec<Library>, AppError> {
        self.library_repo
            .list_libraries_for_user(&self.pool, user_id)
            .await
    }

    pub async fn list_shifts(&self, library_id: Uuid) -> Result<Vec<Shift>, AppError> {
        self.library_repo.list_shifts(&self.pool, library_id).await
    }

    pub async fn list_seats(&self, library_id: Uuid) -> Result<Vec<Seat>, AppError> {
        self.library_repo.list_seats(&self.pool, library_id).await
    }
}
