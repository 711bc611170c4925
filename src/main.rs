use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use dotenv::dotenv;
use expenza_api::application::auth_service::AuthService;
use expenza_api::application::expense_service::ExpenseService;
use expenza_api::data::memory::InMemoryExpenseRepository;
use expenza_api::data::user_repository::InMemoryUserRepository;
use expenza_api::infrastructure::config::Config;
use expenza_api::infrastructure::logging::init_logging;
use expenza_api::presentation::auth::{login, signup};
use expenza_api::presentation::handlers::{
    AppState, add_expense, delete_expense, health_check, list_expenses,
};
use expenza_api::presentation::middleware::{BearerAuth, RequestIdMiddleware, TimingMiddleware};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    init_logging();

    // Configuration is validated once here; a missing signing key refuses
    // startup rather than failing per request.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, refusing to start");
            return Err(std::io::Error::other(e));
        }
    };

    info!("Creating in-memory repositories");
    let user_repository = InMemoryUserRepository::new();
    let expense_repository = InMemoryExpenseRepository::new();

    info!("Creating services");
    let auth_service = AuthService::new(Arc::new(user_repository), config.jwt_secret.clone());
    let expense_service = ExpenseService::new(Arc::new(expense_repository));

    let state = web::Data::new(AppState {
        expense_service,
        auth_service: Arc::new(auth_service),
    });

    let bind_addr = format!("{}:{}", config.host, config.port);

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(signup))
                            .route("/login", web::post().to(login)),
                    )
                    .service(
                        web::scope("/expenses")
                            .wrap(BearerAuth::new(config.jwt_secret.clone()))
                            .route("", web::get().to(list_expenses))
                            .route("", web::post().to(add_expense))
                            .route("/{id}", web::delete().to(delete_expense)),
                    ),
            )
    });

    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind(bind_addr.as_str())?;

    info!(
        address = %bind_addr,
        routes = %"GET /api/health, POST /api/auth/signup, POST /api/auth/login, GET /api/expenses, POST /api/expenses, DELETE /api/expenses/{id}",
        "Starting HTTP server"
    );
    server.run().await
}
