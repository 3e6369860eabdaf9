//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::{auth_guard, library_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Lida com o Result retornado por AppState::new()
    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Onboarding e listagem de bibliotecas (só exige autenticação)
    let library_routes = Router::new()
        .route("/"
               ,post(handlers::library::create_library)
               .get(handlers::library::list_my_libraries)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Dados de referência do tenant (exige pertencimento à biblioteca)
    let library_data_routes = Router::new()
        .route("/shifts", get(handlers::library::list_shifts))
        .route("/seats", get(handlers::library::list_seats))
        .route("/allocations", get(handlers::library::list_allocations))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            library_guard,
        ));

    let student_routes = Router::new()
        .route("/", get(handlers::students::list_students))
        .route(
            "/{id}/status",
            patch(handlers::students::update_student_status),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            library_guard,
        ));

    let subscription_routes = Router::new()
        .route("/", get(handlers::subscriptions::list_subscriptions))
        .route(
            "/vacant-seats",
            get(handlers::subscriptions::get_vacant_seats),
        )
        .route("/{id}", get(handlers::subscriptions::get_subscription))
        .route(
            "/register",
            post(handlers::subscriptions::create_registration),
        )
        .route("/renew", post(handlers::subscriptions::renew_subscription))
        .route(
            "/{id}/cancel",
            post(handlers::subscriptions::cancel_subscription),
        )
        .route(
            "/{id}/close",
            post(handlers::subscriptions::close_subscription),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            library_guard,
        ));

    let payment_routes = Router::new()
        .route("/"
               ,post(handlers::payments::create_payment)
               .get(handlers::payments::list_payments)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            library_guard,
        ));

    let expense_routes = Router::new()
        .route("/"
               ,post(handlers::expenses::create_expense)
               .get(handlers::expenses::list_expenses)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            library_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/permissions", get(handlers::library::list_permissions))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/libraries", library_routes.merge(library_data_routes))
        .nest("/api/students", student_routes)
        .nest("/api/subscriptions", subscription_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/expenses", expense_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
