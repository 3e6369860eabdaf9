// src/services/ledger_service.rs
//
// O livro-razão de alocações e assinaturas: matrícula, pagamento,
// renovação, cancelamento e encerramento. Toda mutação multi-linha
// roda em UMA transação.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        LibraryRepository, PaymentRepository, SeatingRepository, StudentRepository,
        SubscriptionRepository,
    },
    models::{
        library::Shift,
        seating::{AllocationStatus, Seat, SeatAllocation, SeatStatus},
        student::{format_student_code, Gender, Student},
        subscription::{Payment, PaymentMode, Subscription, SubscriptionStatus},
    },
};

/// Valor pendente: custo menos pago menos desconto, com piso em zero.
/// Deve valer após TODA mutação de assinatura.
pub fn pending_amount(cost: Decimal, paid: Decimal, discount: Decimal) -> Decimal {
    let pending = cost - paid - discount;
    if pending < Decimal::ZERO {
        Decimal::ZERO
    } else {
        pending
    }
}

/// Campos derivados do conjunto de turnos escolhido: a janela horária
/// (início mais cedo, fim mais tarde) e a soma das horas.
pub fn derive_shift_window(shifts: &[Shift]) -> (NaiveTime, NaiveTime, Decimal) {
    debug_assert!(!shifts.is_empty());

    let mut start = shifts[0].start_time;
    let mut end = shifts[0].end_time;
    let mut total_hours = Decimal::ZERO;

    for shift in shifts {
        if shift.start_time < start {
            start = shift.start_time;
        }
        if shift.end_time > end {
            end = shift.end_time;
        }
        total_hours += shift.total_hours;
    }

    (start, end, total_hours)
}

// Dados do aluno na matrícula
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_name: String,
    pub mobile_no: String,
    pub gender: Gender,
    pub admission_date: NaiveDate,
}

// Dados do plano (matrícula e renovação)
#[derive(Debug, Clone)]
pub struct PlanFields {
    pub plan_start_date: NaiveDate,
    pub plan_end_date: NaiveDate,
    pub subscription_cost: Decimal,
    pub paid_amount: Decimal,
    pub discount: Decimal,
    pub payment_mode: PaymentMode,
}

#[derive(Clone)]
pub struct LedgerService {
    pool: PgPool,
    library_repo: LibraryRepository,
    student_repo: StudentRepository,
    seating_repo: SeatingRepository,
    subscription_repo: SubscriptionRepository,
    payment_repo: PaymentRepository,
}

impl LedgerService {
    pub fn new(
        pool: PgPool,
        library_repo: LibraryRepository,
        student_repo: StudentRepository,
        seating_repo: SeatingRepository,
        subscription_repo: SubscriptionRepository,
        payment_repo: PaymentRepository,
    ) -> Self {
        Self {
            pool,
            library_repo,
            student_repo,
            seating_repo,
            subscription_repo,
            payment_repo,
        }
    }

    // ---
    // 1. Resolvedor de vagas
    // ---

    /// Assentos disponíveis em TODOS os turnos pedidos. Leitura sem lock:
    /// o resultado é uma dica para a UI, não uma reserva. A verificação
    /// que vale é a da escrita (create_registration).
    pub async fn vacant_seats(
        &self,
        library_id: Uuid,
        shift_ids: &[Uuid],
    ) -> Result<Vec<Seat>, AppError> {
        // Turno de outro tenant (ou inexistente) simplesmente não volta
        // da busca, e o conjunto incompleto é rejeitado.
        let shifts = self
            .library_repo
            .find_shifts_by_ids(&self.pool, library_id, shift_ids)
            .await?;
        if shifts.is_empty() || shifts.len() != shift_ids.len() {
            return Err(AppError::ShiftNotFound);
        }

        self.seating_repo
            .vacant_seats(&self.pool, library_id, shift_ids)
            .await
    }

    /// Visão detalhada de uma assinatura: a linha em si, os turnos dela
    /// e o histórico de pagamentos.
    pub async fn subscription_detail(
        &self,
        library_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<(Subscription, Vec<Uuid>, Vec<Payment>), AppError> {
        let subscription = self
            .subscription_repo
            .find_by_id(&self.pool, library_id, subscription_id)
            .await?
            .ok_or(AppError::SubscriptionNotFound)?;

        let shift_ids = self
            .subscription_repo
            .shift_ids_for_subscription(&self.pool, subscription.id)
            .await?;

        let payments = self
            .payment_repo
            .list_for_subscription(&self.pool, library_id, subscription.id)
            .await?;

        Ok((subscription, shift_ids, payments))
    }

    /// Mapa de ocupação: todas as alocações ativas da biblioteca.
    pub async fn active_allocations(
        &self,
        library_id: Uuid,
    ) -> Result<Vec<SeatAllocation>, AppError> {
        self.seating_repo
            .list_active_for_library(&self.pool, library_id)
            .await
    }

    // ---
    // 2. Matrícula
    // ---

    /// Cria aluno + assinatura + alocações (+ pagamento inicial, se houver)
    /// atomicamente. A ocupação é re-verificada no momento da escrita;
    /// o índice único parcial do banco é a última linha de defesa contra
    /// duas matrículas concorrentes no mesmo (assento, turno).
    pub async fn create_registration(
        &self,
        actor_id: Uuid,
        library_id: Uuid,
        new_student: NewStudent,
        seat_id: Uuid,
        shift_ids: &[Uuid],
        plan: PlanFields,
    ) -> Result<(Student, Subscription), AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Pertencimento: todo turno e o assento devem ser da biblioteca
        let shifts = self
            .library_repo
            .find_shifts_by_ids(&mut *tx, library_id, shift_ids)
            .await?;
        if shifts.is_empty() || shifts.len() != shift_ids.len() {
            return Err(AppError::ShiftNotFound);
        }

        let seat = self
            .library_repo
            .find_seat(&mut *tx, library_id, seat_id)
            .await?
            .ok_or(AppError::SeatNotFound)?;
        // Assento bloqueado nunca recebe matrícula
        if seat.status == SeatStatus::Blocked {
            return Err(AppError::SeatAlreadyOccupied);
        }

        // 2. Re-verificação de ocupação no momento da escrita (fecha a
        //    corrida que o resolvedor sozinho não fecha)
        let conflicts = self
            .seating_repo
            .count_active_occupied(&mut *tx, seat_id, shift_ids)
            .await?;
        if conflicts > 0 {
            return Err(AppError::SeatAlreadyOccupied);
        }

        // 3. Campos derivados dos turnos
        let (shift_start, shift_end, total_hours) = derive_shift_window(&shifts);

        // 4. Aritmética do pendente
        let pending = pending_amount(plan.subscription_cost, plan.paid_amount, plan.discount);

        // 5. Persistência: aluno, assinatura, turnos, alocações, pagamento
        let serial = self.student_repo.next_serial(&mut *tx, library_id).await?;
        let student_code = format_student_code(serial);

        let student = self
            .student_repo
            .create_student(
                &mut *tx,
                library_id,
                serial,
                &student_code,
                &new_student.student_name,
                &new_student.mobile_no,
                new_student.gender,
                new_student.admission_date,
            )
            .await?;

        let subscription = self
            .subscription_repo
            .create_subscription(
                &mut *tx,
                library_id,
                student.id,
                seat_id,
                plan.plan_start_date,
                plan.plan_end_date,
                total_hours,
                shift_start,
                shift_end,
                plan.subscription_cost,
                plan.paid_amount,
                plan.discount,
                pending,
                actor_id,
            )
            .await?;

        self.subscription_repo
            .add_subscription_shifts(&mut *tx, subscription.id, shift_ids)
            .await?;

        for shift_id in shift_ids {
            self.seating_repo
                .create_allocation(
                    &mut *tx,
                    library_id,
                    seat_id,
                    *shift_id,
                    student.id,
                    subscription.id,
                    AllocationStatus::Occupied,
                    student.gender,
                )
                .await?;
        }

        if plan.paid_amount > Decimal::ZERO {
            self.payment_repo
                .create_payment(
                    &mut *tx,
                    library_id,
                    student.id,
                    subscription.id,
                    plan.paid_amount,
                    plan.plan_start_date,
                    plan.payment_mode,
                    actor_id,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "📝 Matrícula {} criada (assento {}, {} turno(s))",
            student.student_code,
            seat.seat_number,
            shift_ids.len()
        );

        Ok((student, subscription))
    }

    // ---
    // 3. Pagamento
    // ---

    /// Registra um pagamento e recomputa paid/pending da assinatura-mãe
    /// na MESMA transação, com lock de linha (FOR UPDATE): dois pagamentos
    /// concorrentes na mesma assinatura não se perdem.
    pub async fn add_payment(
        &self,
        actor_id: Uuid,
        library_id: Uuid,
        subscription_id: Uuid,
        amount: Decimal,
        payment_mode: PaymentMode,
        payment_date: NaiveDate,
    ) -> Result<Payment, AppError> {
        let mut tx = self.pool.begin().await?;

        let subscription = self
            .subscription_repo
            .find_by_id_for_update(&mut *tx, library_id, subscription_id)
            .await?
            .ok_or(AppError::SubscriptionNotFound)?;

        let new_paid = subscription.paid_amount + amount;
        let new_pending = pending_amount(
            subscription.subscription_cost,
            new_paid,
            subscription.discount,
        );

        self.subscription_repo
            .update_amounts(&mut *tx, subscription.id, new_paid, new_pending)
            .await?;

        let payment = self
            .payment_repo
            .create_payment(
                &mut *tx,
                library_id,
                subscription.student_id,
                subscription.id,
                amount,
                payment_date,
                payment_mode,
                actor_id,
            )
            .await?;

        tx.commit().await?;
        Ok(payment)
    }

    // ---
    // 4. Renovação
    // ---

    /// Transição Active -> Renewed da assinatura vigente + criação da
    /// sucessora (mesmo assento, mesmos turnos, plano novo), tudo em uma
    /// transação. Sem nova checagem de vaga: o ocupante reaproveita o
    /// próprio assento, e a troca alocação-velha/alocação-nova acontece
    /// dentro da mesma transação.
    pub async fn renew_subscription(
        &self,
        actor_id: Uuid,
        library_id: Uuid,
        student_id: Uuid,
        plan: PlanFields,
    ) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .subscription_repo
            .find_active_by_student_for_update(&mut *tx, library_id, student_id)
            .await?
            .ok_or(AppError::NoActiveSubscription)?;

        let shift_ids = self
            .subscription_repo
            .shift_ids_for_subscription(&mut *tx, current.id)
            .await?;

        // A antecessora vira RENEWED (nunca volta a ser ativa) e perde
        // as alocações; a sucessora recebe alocações novas.
        self.subscription_repo
            .update_status(&mut *tx, current.id, SubscriptionStatus::Renewed)
            .await?;
        self.seating_repo
            .deactivate_for_subscription(&mut *tx, current.id)
            .await?;

        let pending = pending_amount(plan.subscription_cost, plan.paid_amount, plan.discount);

        let successor = self
            .subscription_repo
            .create_subscription(
                &mut *tx,
                library_id,
                student_id,
                current.seat_id,
                plan.plan_start_date,
                plan.plan_end_date,
                current.total_hours,
                current.shift_start,
                current.shift_end,
                plan.subscription_cost,
                plan.paid_amount,
                plan.discount,
                pending,
                actor_id,
            )
            .await?;

        self.subscription_repo
            .add_subscription_shifts(&mut *tx, successor.id, &shift_ids)
            .await?;

        let gender = self
            .student_repo
            .find_by_id(&mut *tx, library_id, student_id)
            .await?
            .ok_or(AppError::StudentNotFound)?
            .gender;

        for shift_id in &shift_ids {
            self.seating_repo
                .create_allocation(
                    &mut *tx,
                    library_id,
                    current.seat_id,
                    *shift_id,
                    student_id,
                    successor.id,
                    AllocationStatus::Occupied,
                    gender,
                )
                .await?;
        }

        if plan.paid_amount > Decimal::ZERO {
            self.payment_repo
                .create_payment(
                    &mut *tx,
                    library_id,
                    student_id,
                    successor.id,
                    plan.paid_amount,
                    plan.plan_start_date,
                    plan.payment_mode,
                    actor_id,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!("🔄 Assinatura {} renovada -> {}", current.id, successor.id);
        Ok(successor)
    }

    // ---
    // 5. Cancelamento / Encerramento
    // ---

    /// Cancelamento: término antes do fim do plano. Libera o assento.
    pub async fn cancel_subscription(
        &self,
        library_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Subscription, AppError> {
        self.terminate(library_id, subscription_id, SubscriptionStatus::Cancelled)
            .await
    }

    /// Encerramento: o plano cumpriu o curso até o fim. Libera o assento
    /// do mesmo jeito; a diferença fica só no status gravado.
    pub async fn close_subscription(
        &self,
        library_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Subscription, AppError> {
        self.terminate(library_id, subscription_id, SubscriptionStatus::Closed)
            .await
    }

    // Transição terminal de mão única: só sai de Active.
    async fn terminate(
        &self,
        library_id: Uuid,
        subscription_id: Uuid,
        target: SubscriptionStatus,
    ) -> Result<Subscription, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .subscription_repo
            .find_by_id_for_update(&mut *tx, library_id, subscription_id)
            .await?
            .ok_or(AppError::SubscriptionNotFound)?;

        if current.status.is_terminal() {
            return Err(AppError::InvalidSubscriptionState(current.status));
        }

        let updated = self
            .subscription_repo
            .update_status(&mut *tx, current.id, target)
            .await?;
        self.seating_repo
            .deactivate_for_subscription(&mut *tx, current.id)
            .await?;

        tx.commit().await?;

        tracing::info!("⛔ Assinatura {} -> {:?}", current.id, target);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn shift(name: &str, start: (u32, u32), end: (u32, u32), hours: &str) -> Shift {
        Shift {
            id: Uuid::new_v4(),
            library_id: Uuid::new_v4(),
            name: name.to_string(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            total_hours: dec(hours),
        }
    }

    #[test]
    fn pendente_e_custo_menos_pago_menos_desconto() {
        assert_eq!(
            pending_amount(dec("1000.00"), dec("400.00"), dec("0.00")),
            dec("600.00")
        );
        assert_eq!(
            pending_amount(dec("1000.00"), dec("800.00"), dec("200.00")),
            dec("0.00")
        );
    }

    #[test]
    fn pendente_nunca_fica_negativo() {
        // Pagamento acima do custo: o pendente trava em zero
        assert_eq!(
            pending_amount(dec("500.00"), dec("700.00"), dec("0.00")),
            Decimal::ZERO
        );
        assert_eq!(
            pending_amount(dec("500.00"), dec("300.00"), dec("300.00")),
            Decimal::ZERO
        );
    }

    #[test]
    fn pagamentos_sucessivos_abatem_o_pendente_exatamente() {
        let cost = dec("1000.00");
        let discount = dec("100.00");

        let mut paid = dec("0.00");
        assert_eq!(pending_amount(cost, paid, discount), dec("900.00"));

        paid += dec("400.00");
        assert_eq!(pending_amount(cost, paid, discount), dec("500.00"));

        paid += dec("500.00");
        assert_eq!(pending_amount(cost, paid, discount), dec("0.00"));
    }

    #[test]
    fn janela_de_turnos_pega_inicio_mais_cedo_e_fim_mais_tarde() {
        let shifts = vec![
            shift("Tarde", (12, 0), (18, 0), "6.00"),
            shift("Manhã", (6, 0), (12, 0), "6.00"),
            shift("Noite", (18, 0), (23, 0), "5.00"),
        ];

        let (start, end, total) = derive_shift_window(&shifts);
        assert_eq!(start, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        assert_eq!(total, dec("17.00"));
    }

    #[test]
    fn janela_de_um_turno_so_e_o_proprio_turno() {
        let shifts = vec![shift("Manhã", (6, 0), (12, 0), "6.00")];
        let (start, end, total) = derive_shift_window(&shifts);
        assert_eq!(start, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(total, dec("6.00"));
    }
}
