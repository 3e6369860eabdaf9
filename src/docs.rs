// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Libraries ---
        handlers::library::create_library,
        handlers::library::list_my_libraries,
        handlers::library::list_shifts,
        handlers::library::list_seats,
        handlers::library::list_allocations,
        handlers::library::list_permissions,

        // --- Students ---
        handlers::students::list_students,
        handlers::students::update_student_status,

        // --- Subscriptions ---
        handlers::subscriptions::get_vacant_seats,
        handlers::subscriptions::get_subscription,
        handlers::subscriptions::create_registration,
        handlers::subscriptions::renew_subscription,
        handlers::subscriptions::cancel_subscription,
        handlers::subscriptions::close_subscription,
        handlers::subscriptions::list_subscriptions,

        // --- Payments ---
        handlers::payments::create_payment,
        handlers::payments::list_payments,

        // --- Expenses ---
        handlers::expenses::create_expense,
        handlers::expenses::list_expenses,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Libraries ---
            models::library::Library,
            models::library::UserLibrary,
            models::library::Shift,
            handlers::library::CreateLibraryPayload,
            handlers::library::ShiftPayload,
            handlers::library::LibraryCreatedResponse,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::PermissionInfo,

            // --- Seating ---
            models::seating::SeatStatus,
            models::seating::AllocationStatus,
            models::seating::Seat,
            models::seating::SeatAllocation,

            // --- Students ---
            models::student::Gender,
            models::student::StudentStatus,
            models::student::Student,
            handlers::students::UpdateStudentStatusPayload,

            // --- Subscriptions ---
            models::subscription::SubscriptionStatus,
            models::subscription::PaymentMode,
            models::subscription::PaymentStatus,
            models::subscription::Subscription,
            models::subscription::Payment,
            handlers::subscriptions::VacantSeatsParams,
            handlers::subscriptions::CreateRegistrationPayload,
            handlers::subscriptions::RegistrationResponse,
            handlers::subscriptions::SubscriptionDetailResponse,
            handlers::subscriptions::RenewSubscriptionPayload,
            handlers::payments::CreatePaymentPayload,

            // --- Expenses ---
            models::expense::Expense,
            handlers::expenses::CreateExpensePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Libraries", description = "Onboarding e Gestão da Biblioteca"),
        (name = "RBAC", description = "Controle de Acesso (Papéis e Permissões)"),
        (name = "Students", description = "Gestão de Alunos"),
        (name = "Subscriptions", description = "Matrículas, Vagas e Ciclo de Vida de Assinaturas"),
        (name = "Payments", description = "Livro-Razão de Pagamentos"),
        (name = "Expenses", description = "Despesas da Biblioteca")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
