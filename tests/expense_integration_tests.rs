use actix_web::{App, test, web};
use expenza_api::application::auth_service::AuthService;
use expenza_api::application::expense_service::ExpenseService;
use expenza_api::data::memory::InMemoryExpenseRepository;
use expenza_api::data::user_repository::InMemoryUserRepository;
use expenza_api::infrastructure::security::generate_token;
use expenza_api::presentation::auth::{login, signup};
use expenza_api::presentation::handlers::{AppState, add_expense, delete_expense, list_expenses};
use expenza_api::presentation::middleware::BearerAuth;
use std::sync::Arc;

const TEST_SECRET: &str = "test-secret-key-for-expense-tests";

macro_rules! setup_expense_test {
    () => {{
        let expense_repository = InMemoryExpenseRepository::new();
        let expense_service = ExpenseService::new(Arc::new(expense_repository));

        let user_repository = InMemoryUserRepository::new();
        let auth_service = AuthService::new(Arc::new(user_repository), TEST_SECRET.to_string());

        let state = web::Data::new(AppState {
            expense_service,
            auth_service: Arc::new(auth_service),
        });

        test::init_service(
            App::new().app_data(state.clone()).service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(signup))
                            .route("/login", web::post().to(login)),
                    )
                    .service(
                        web::scope("/expenses")
                            .wrap(BearerAuth::new(TEST_SECRET.to_string()))
                            .route("", web::get().to(list_expenses))
                            .route("", web::post().to(add_expense))
                            .route("/{id}", web::delete().to(delete_expense)),
                    ),
            ),
        )
        .await
    }};
}

macro_rules! signup_user {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(serde_json::json!({
                "email": $email,
                "password": "password123",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body["token"].as_str().unwrap().to_string()
    }};
}

macro_rules! add_expense_req {
    ($token:expr, $title:expr, $amount:expr) => {
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json(serde_json::json!({
                "title": $title,
                "category": "Coffee",
                "amount": $amount,
                "date": "2024-01-01",
            }))
            .to_request()
    };
}

macro_rules! list_expenses_req {
    ($token:expr) => {
        test::TestRequest::get()
            .uri("/api/expenses")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request()
    };
}

#[actix_web::test]
async fn test_add_list_delete_scenario() {
    let app = setup_expense_test!();
    let token = signup_user!(app, "a@x.com");

    // Add
    let resp = test::call_service(&app, add_expense_req!(token, "coffee", 50)).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["title"], "coffee");
    assert_eq!(created["category"], "Coffee");
    assert_eq!(created["amount"], 50.0);
    assert_eq!(created["date"], "2024-01-01");
    let expense_id = created["id"].as_str().unwrap().to_string();

    // List shows exactly the new record
    let resp = test::call_service(&app, list_expenses_req!(token)).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let listed: serde_json::Value = test::read_body_json(resp).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], expense_id.as_str());
    assert_eq!(listed[0]["amount"], 50.0);

    // Delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/expenses/{}", expense_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Expense deleted");

    // List is empty again
    let resp = test::call_service(&app, list_expenses_req!(token)).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_list_preserves_insertion_order() {
    let app = setup_expense_test!();
    let token = signup_user!(app, "ordered@example.com");

    for title in ["first", "second", "third"] {
        let resp = test::call_service(&app, add_expense_req!(token, title, 10)).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    }

    let resp = test::call_service(&app, list_expenses_req!(token)).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

#[actix_web::test]
async fn test_expenses_require_bearer_token() {
    let app = setup_expense_test!();

    let req = test::TestRequest::get().uri("/api/expenses").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("error").is_some());

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .set_json(serde_json::json!({
            "title": "coffee",
            "category": "Coffee",
            "amount": 50,
            "date": "2024-01-01",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_invalid_tokens_rejected() {
    let app = setup_expense_test!();

    // Garbled token
    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    // Wrong scheme
    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    // Token signed with a different secret
    let foreign = generate_token("some-user", "another-secret").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/expenses")
        .insert_header(("Authorization", format!("Bearer {}", foreign)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expenses_are_isolated_between_users() {
    let app = setup_expense_test!();
    let token_a = signup_user!(app, "alice@example.com");
    let token_b = signup_user!(app, "bob@example.com");

    let resp = test::call_service(&app, add_expense_req!(token_a, "alice rent", 900)).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let resp = test::call_service(&app, list_expenses_req!(token_a)).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let resp = test::call_service(&app, list_expenses_req!(token_b)).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_delete_foreign_expense_is_not_found() {
    let app = setup_expense_test!();
    let token_a = signup_user!(app, "owner@example.com");
    let token_b = signup_user!(app, "intruder@example.com");

    let resp = test::call_service(&app, add_expense_req!(token_a, "groceries", 75)).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let expense_id = created["id"].as_str().unwrap().to_string();

    // B cannot delete A's record
    let req = test::TestRequest::delete()
        .uri(&format!("/api/expenses/{}", expense_id))
        .insert_header(("Authorization", format!("Bearer {}", token_b)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

    // The record is still there for A
    let resp = test::call_service(&app, list_expenses_req!(token_a)).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_delete_nonexistent_expense_is_not_found() {
    let app = setup_expense_test!();
    let token = signup_user!(app, "deleter@example.com");

    let req = test::TestRequest::delete()
        .uri("/api/expenses/1c7b36c2-0000-0000-0000-000000000000")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_negative_amount_rejected_and_not_persisted() {
    let app = setup_expense_test!();
    let token = signup_user!(app, "negative@example.com");

    let resp = test::call_service(&app, add_expense_req!(token, "refund", -5)).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, list_expenses_req!(token)).await;
    let listed: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_missing_amount_rejected() {
    let app = setup_expense_test!();
    let token = signup_user!(app, "partial@example.com");

    let req = test::TestRequest::post()
        .uri("/api/expenses")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(serde_json::json!({
            "title": "coffee",
            "category": "Coffee",
            "date": "2024-01-01",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_zero_amount_accepted() {
    let app = setup_expense_test!();
    let token = signup_user!(app, "zero@example.com");

    let resp = test::call_service(&app, add_expense_req!(token, "freebie", 0)).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(created["amount"], 0.0);
}
