// src/db/library_repo.rs

use chrono::NaiveTime;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        library::{Library, Shift, UserLibrary},
        rbac::Role,
        seating::Seat,
    },
};

#[derive(Clone)]
pub struct LibraryRepository {
    pool: PgPool,
}

impl LibraryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verifica se um usuário é membro de uma biblioteca e devolve o papel dele.
    /// Esta é a verificação de segurança de autorização mais importante.
    pub async fn find_membership_role(
        &self,
        user_id: Uuid,
        library_id: Uuid,
    ) -> Result<Option<Role>, AppError> {
        let row: Option<(Role,)> = sqlx::query_as(
            r#"
            SELECT role FROM user_libraries
            WHERE user_id = $1 AND library_id = $2
            "#,
        )
        .bind(user_id)
        .bind(library_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(role,)| role))
    }

    /// Cria uma nova biblioteca (tenant) na base de dados.
    pub async fn create_library<'e, E>(
        &self,
        executor: E, // Aceita um executor (pool ou transação)
        name: &str,
        total_seats: i32,
    ) -> Result<Library, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let library = sqlx::query_as::<_, Library>(
            r#"
            INSERT INTO libraries (name, total_seats)
            VALUES ($1, $2)
            RETURNING id, name, total_seats, is_active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(total_seats)
        .fetch_one(executor)
        .await?;

        Ok(library)
    }

    /// Atribui um usuário a uma biblioteca (na tabela-ponte), com papel.
    pub async fn assign_user_to_library<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        library_id: Uuid,
        role: Role,
    ) -> Result<UserLibrary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, UserLibrary>(
            r#"
            INSERT INTO user_libraries (user_id, library_id, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, library_id, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(library_id)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| e.into()) // Chave duplicada é tratada pelo serviço
    }

    pub async fn list_libraries_for_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Library>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let libraries = sqlx::query_as::<_, Library>(
            r#"
            SELECT l.id, l.name, l.total_seats, l.is_active, l.created_at, l.updated_at
            FROM libraries l
            JOIN user_libraries ul ON ul.library_id = l.id
            WHERE ul.user_id = $1
            ORDER BY l.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(libraries)
    }

    // ---
    // Turnos (dados de referência do tenant)
    // ---

    pub async fn create_shift<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        name: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        total_hours: Decimal,
    ) -> Result<Shift, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            INSERT INTO shifts (library_id, name, start_time, end_time, total_hours)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, library_id, name, start_time, end_time, total_hours
            "#,
        )
        .bind(library_id)
        .bind(name)
        .bind(start_time)
        .bind(end_time)
        .bind(total_hours)
        .fetch_one(executor)
        .await?;

        Ok(shift)
    }

    pub async fn list_shifts<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<Shift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, library_id, name, start_time, end_time, total_hours
            FROM shifts
            WHERE library_id = $1
            ORDER BY start_time ASC
            "#,
        )
        .bind(library_id)
        .fetch_all(executor)
        .await?;

        Ok(shifts)
    }

    /// Busca os turnos pedidos DENTRO da biblioteca-alvo: um id de outro
    /// tenant simplesmente não volta, e o chamador trata como não-encontrado.
    pub async fn find_shifts_by_ids<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        shift_ids: &[Uuid],
    ) -> Result<Vec<Shift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, library_id, name, start_time, end_time, total_hours
            FROM shifts
            WHERE library_id = $1 AND id = ANY($2)
            ORDER BY start_time ASC
            "#,
        )
        .bind(library_id)
        .bind(shift_ids)
        .fetch_all(executor)
        .await?;

        Ok(shifts)
    }

    // ---
    // Assentos
    // ---

    /// Semeia os assentos 1..=total_seats de uma biblioteca recém-criada.
    pub async fn seed_seats<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        total_seats: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO seats (library_id, seat_number)
            SELECT $1, n FROM generate_series(1, $2) AS n
            "#,
        )
        .bind(library_id)
        .bind(total_seats)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_seats<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<Seat>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT id, library_id, seat_number, status
            FROM seats
            WHERE library_id = $1
            ORDER BY seat_number ASC
            "#,
        )
        .bind(library_id)
        .fetch_all(executor)
        .await?;

        Ok(seats)
    }

    pub async fn find_seat<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        seat_id: Uuid,
    ) -> Result<Option<Seat>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seat = sqlx::query_as::<_, Seat>(
            r#"
            SELECT id, library_id, seat_number, status
            FROM seats
            WHERE library_id = $1 AND id = $2
            "#,
        )
        .bind(library_id)
        .bind(seat_id)
        .fetch_optional(executor)
        .await?;

        Ok(seat)
    }
}
