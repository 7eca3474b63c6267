// Portfolio Matrix - Web Server
// REST API with Axum over the shared portfolio store

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use portfolio_matrix::{
    load_accounts, open_store, save_accounts, storage, validate_input, AccountInput,
    CalculatedAccount, Category, LabelPlacement, LayoutConfig, Point, PortfolioStore,
    PortfolioStats,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<PortfolioStore>>,
    db: Arc<Mutex<Connection>>,
    layout: LayoutConfig,
}

impl AppState {
    /// Write the current collection through to the backing store.
    fn persist(&self) {
        let store = self.store.lock().unwrap();
        let db = self.db.lock().unwrap();
        if let Err(e) = save_accounts(&db, store.accounts()) {
            eprintln!("Error persisting portfolio: {}", e);
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error,
        }),
    )
        .into_response()
}

/// Stats response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    total_accounts: usize,
    total_arr: f64,
    #[serde(flatten)]
    maxima: PortfolioStats,
    by_category: Vec<CategoryStat>,
}

#[derive(Serialize)]
struct CategoryStat {
    category: &'static str,
    count: usize,
    color: &'static str,
}

/// Layout geometry for one selected account
#[derive(Serialize)]
struct LayoutResponse {
    point: Point,
    label: LabelPlacement,
    tooltip: Point,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/accounts - All accounts with derived scores and categories
async fn get_accounts(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();
    let accounts: Vec<CalculatedAccount> = store.calculated().to_vec();
    Json(ApiResponse::ok(accounts))
}

/// GET /api/stats - Portfolio statistics
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().unwrap();

    let by_category = Category::all()
        .into_iter()
        .map(|category| CategoryStat {
            category: category.as_str(),
            count: store.category_count(category),
            color: category.color(),
        })
        .collect();

    let stats = StatsResponse {
        total_accounts: store.len(),
        total_arr: store.total_arr(),
        maxima: store.stats(),
        by_category,
    };

    Json(ApiResponse::ok(stats))
}

/// GET /api/accounts/:id/layout - Plane geometry for one account
async fn get_layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let store = state.store.lock().unwrap();

    let Some(calc) = store.find_calculated(&id) else {
        return error_response(StatusCode::NOT_FOUND, format!("Account not found: {}", id));
    };

    let point = state.layout.point(calc.volume_score, calc.potential_score);
    let geometry = LayoutResponse {
        point,
        label: state.layout.label_placement(point),
        tooltip: state.layout.tooltip_placement(point),
    };

    (StatusCode::OK, Json(ApiResponse::ok(geometry))).into_response()
}

/// POST /api/accounts - Create an account
async fn create_account(
    State(state): State<AppState>,
    Json(input): Json<AccountInput>,
) -> axum::response::Response {
    if let Err(errors) = validate_input(&input) {
        let summary = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, summary);
    }

    let id = {
        let mut store = state.store.lock().unwrap();
        store.add(input)
    };
    state.persist();

    let store = state.store.lock().unwrap();
    match store.find_calculated(&id) {
        Some(calc) => (StatusCode::CREATED, Json(ApiResponse::ok(calc.clone()))).into_response(),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Created account missing from store".to_string(),
        ),
    }
}

/// PUT /api/accounts/:id - Update an account
async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AccountInput>,
) -> axum::response::Response {
    if let Err(errors) = validate_input(&input) {
        let summary = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, summary);
    }

    let updated = {
        let mut store = state.store.lock().unwrap();
        store.update(&id, input)
    };
    if let Err(e) = updated {
        return error_response(StatusCode::NOT_FOUND, e.to_string());
    }
    state.persist();

    let store = state.store.lock().unwrap();
    match store.find_calculated(&id) {
        Some(calc) => (StatusCode::OK, Json(ApiResponse::ok(calc.clone()))).into_response(),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Updated account missing from store".to_string(),
        ),
    }
}

/// DELETE /api/accounts/:id - Delete an account
async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let removed = {
        let mut store = state.store.lock().unwrap();
        store.remove(&id)
    };
    if let Err(e) = removed {
        return error_response(StatusCode::NOT_FOUND, e.to_string());
    }
    state.persist();

    (StatusCode::OK, Json(ApiResponse::ok(id))).into_response()
}

/// POST /api/import - Replace the portfolio from a JSON document
async fn import_portfolio(
    State(state): State<AppState>,
    body: String,
) -> axum::response::Response {
    let accounts = match storage::import_json(&body) {
        Ok(accounts) => accounts,
        Err(e) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };

    let count = accounts.len();
    {
        let mut store = state.store.lock().unwrap();
        store.replace_all(accounts);
    }
    state.persist();

    (StatusCode::OK, Json(ApiResponse::ok(count))).into_response()
}

/// GET /api/export - The portfolio in interchange form
async fn export_portfolio(State(state): State<AppState>) -> axum::response::Response {
    let store = state.store.lock().unwrap();

    match storage::export_json(store.accounts()) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Portfolio Matrix - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path = std::env::var_os("PORTFOLIO_MATRIX_DB")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("portfolio.db"));

    let conn = open_store(&db_path).expect("Failed to open store");
    let accounts = load_accounts(&conn).expect("Failed to load portfolio");
    println!("✓ Store opened: {:?} ({} accounts)", db_path, accounts.len());

    let state = AppState {
        store: Arc::new(Mutex::new(PortfolioStore::from_accounts(accounts))),
        db: Arc::new(Mutex::new(conn)),
        layout: LayoutConfig::default(),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/accounts", get(get_accounts).post(create_account))
        .route("/accounts/:id", put(update_account).delete(delete_account))
        .route("/accounts/:id/layout", get(get_layout))
        .route("/stats", get(get_stats))
        .route("/import", post(import_portfolio))
        .route("/export", get(export_portfolio))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/accounts");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
