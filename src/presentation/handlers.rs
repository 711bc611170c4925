use crate::application::auth_service::AuthService;
use crate::application::expense_service::ExpenseService;
use crate::data::memory::InMemoryExpenseRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::expense::NewExpense;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

// AppState holding the services
pub struct AppState {
    pub expense_service: ExpenseService<InMemoryExpenseRepository>,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database error")]
    Database(String),
    #[error("Internal error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::Database(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        // 500-class responses carry a generic message; the cause stays in
        // the server log only.
        let details = match self {
            ApiError::Validation(msg) => serde_json::json!({ "message": msg }),
            ApiError::NotFound(msg) => serde_json::json!({ "message": msg }),
            ApiError::Unauthorized(msg) => serde_json::json!({ "message": msg }),
            ApiError::Database(_) | ApiError::Internal(_) => {
                serde_json::json!({ "message": "Internal server error" })
            }
        };

        match self {
            ApiError::Validation(_) => {
                warn!(error = %error_msg, status = %status, "Validation error")
            }
            ApiError::NotFound(_) => {
                warn!(error = %error_msg, status = %status, "Resource not found")
            }
            ApiError::Unauthorized(_) => {
                warn!(error = %error_msg, status = %status, "Unauthorized")
            }
            ApiError::Database(cause) => {
                error!(error = %cause, status = %status, "Database error")
            }
            ApiError::Internal(cause) => {
                error!(error = %cause, status = %status, "Internal error")
            }
        }

        let error_response = ErrorResponse {
            error: error_msg,
            details,
        };

        HttpResponse::build(status).json(error_response)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::DuplicateEmail) => {
                ApiError::Validation("Email already exists".to_string())
            }
            Some(DomainError::InvalidCredentials) => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            Some(DomainError::Unauthenticated) => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            Some(DomainError::InvalidInput(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Database(err.to_string()),
        }
    }
}

// AuthenticatedUser extractor, populated by the bearer gate middleware
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
        })
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[derive(Serialize)]
struct DeleteResponse {
    message: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_expenses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let expenses = state
        .expense_service
        .list(&user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list expenses");
            ApiError::from(e)
        })?;
    info!(count = expenses.len(), "Expenses listed");
    Ok(HttpResponse::Ok().json(expenses))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn add_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<NewExpense>,
) -> Result<HttpResponse, ApiError> {
    let expense = state
        .expense_service
        .add(&user.user_id, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to add expense");
            ApiError::from(e)
        })?;
    info!(expense_id = %expense.id, "Expense created");
    Ok(HttpResponse::Created().json(expense))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id, expense_id = %*path))]
pub async fn delete_expense(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let expense_id = path.into_inner();
    state
        .expense_service
        .delete(&user.user_id, &expense_id)
        .await
        .map_err(|e| {
            error!(expense_id = %expense_id, error = %e, "Failed to delete expense");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Expense deleted".to_string(),
    }))
}
