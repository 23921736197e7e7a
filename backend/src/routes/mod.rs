//! Route definitions for the gym billing backend

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::session_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (login public, logout/me behind the session)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes
        .nest("/plans", plan_routes(state.clone()))
        .nest("/invoices", invoice_routes(state.clone()))
        .nest("/products", product_routes(state.clone()))
        .nest("/sales", sale_routes(state.clone()))
        .nest("/expenses", expense_routes(state.clone()))
        .nest("/staff", staff_routes(state.clone()))
        .nest("/reports", report_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, session_middleware));

    Router::new()
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// Membership plan routes (protected)
fn plan_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_plans))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route("/export", get(handlers::export_invoices))
        .route("/:invoice_code", get(handlers::get_invoice))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Shop product routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            axum::routing::patch(handlers::update_product).delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Shop checkout and history routes (protected)
fn sale_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::checkout))
        .route("/history", get(handlers::sales_history))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Expense routes (protected)
fn expense_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Staff routes (protected)
fn staff_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_staff).post(handlers::create_staff))
        .route("/:staff_id", delete(handlers::delete_staff))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}

/// Reporting routes (protected)
fn report_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::report_summary))
        .route_layer(middleware::from_fn_with_state(state, session_middleware))
}
