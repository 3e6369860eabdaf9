// src/db/seating_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        seating::{AllocationStatus, Seat, SeatAllocation},
        student::Gender,
    },
};

#[derive(Clone)]
pub struct SeatingRepository {
    pool: PgPool,
}

impl SeatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // O resolvedor de vagas (leitura, sem lock)
    // ---

    /// Assentos da biblioteca sem NENHUMA alocação ativa-ocupada em QUALQUER
    /// um dos turnos pedidos. Um assento ocupado em um único turno do
    /// conjunto já fica de fora: a matrícula exige disponibilidade
    /// simultânea em todos. Assentos bloqueados nunca voltam.
    ///
    /// O resultado é apenas uma dica para a UI, não uma reserva: a
    /// verificação que vale é a do momento da escrita (índice único parcial).
    pub async fn vacant_seats<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        shift_ids: &[Uuid],
    ) -> Result<Vec<Seat>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT s.id, s.library_id, s.seat_number, s.status
            FROM seats s
            WHERE s.library_id = $1
              AND s.status <> 'BLOCKED'
              AND NOT EXISTS (
                  SELECT 1 FROM seat_allocations sa
                  WHERE sa.seat_id = s.id
                    AND sa.shift_id = ANY($2)
                    AND sa.is_active = TRUE
                    AND sa.status = 'OCCUPIED'
              )
            ORDER BY s.seat_number ASC
            "#,
        )
        .bind(library_id)
        .bind(shift_ids)
        .fetch_all(executor)
        .await?;

        Ok(seats)
    }

    /// Re-verificação no momento da escrita: conta alocações ativas-ocupadas
    /// do assento nos turnos pedidos. Qualquer linha encontrada é conflito.
    pub async fn count_active_occupied<'e, E>(
        &self,
        executor: E,
        seat_id: Uuid,
        shift_ids: &[Uuid],
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM seat_allocations
            WHERE seat_id = $1
              AND shift_id = ANY($2)
              AND is_active = TRUE
              AND status = 'OCCUPIED'
            "#,
        )
        .bind(seat_id)
        .bind(shift_ids)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Cria uma alocação (assento, turno) para um aluno.
    /// A violação do índice único parcial é a última linha de defesa contra
    /// a corrida leitura-depois-escrita, e vira SeatAlreadyOccupied.
    pub async fn create_allocation<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        seat_id: Uuid,
        shift_id: Uuid,
        student_id: Uuid,
        subscription_id: Uuid,
        status: AllocationStatus,
        gender: Gender,
    ) -> Result<SeatAllocation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let allocation = sqlx::query_as::<_, SeatAllocation>(
            r#"
            INSERT INTO seat_allocations (
                library_id, seat_id, shift_id, student_id, subscription_id,
                status, gender
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, library_id, seat_id, shift_id, student_id,
                      subscription_id, status, gender, is_active, created_at
            "#,
        )
        .bind(library_id)
        .bind(seat_id)
        .bind(shift_id)
        .bind(student_id)
        .bind(subscription_id)
        .bind(status)
        .bind(gender)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SeatAlreadyOccupied;
                }
            }
            e.into()
        })?;

        Ok(allocation)
    }

    /// Exclusão lógica: desativa as alocações de uma assinatura.
    /// Chamada na renovação, no cancelamento e no encerramento.
    pub async fn deactivate_for_subscription<'e, E>(
        &self,
        executor: E,
        subscription_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE seat_allocations
            SET is_active = FALSE
            WHERE subscription_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(subscription_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_active_for_library<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<SeatAllocation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let allocations = sqlx::query_as::<_, SeatAllocation>(
            r#"
            SELECT id, library_id, seat_id, shift_id, student_id,
                   subscription_id, status, gender, is_active, created_at
            FROM seat_allocations
            WHERE library_id = $1 AND is_active = TRUE
            ORDER BY created_at ASC
            "#,
        )
        .bind(library_id)
        .fetch_all(executor)
        .await?;

        Ok(allocations)
    }
}
