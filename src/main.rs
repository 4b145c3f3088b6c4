use axum::{
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use drinks_api::auth::Scope;
use drinks_api::database::store::{self, DrinkStore};
use drinks_api::error::ApiError;
use drinks_api::handlers::drinks;
use drinks_api::middleware::auth::guard;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = drinks_api::config::config();
    tracing::info!("Starting Drinks API in {:?} mode", config.environment);

    let pool = store::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to open database {}: {}", config.database.url, e));

    let store = DrinkStore::new(pool);
    store
        .bootstrap(config.database.recreate_on_boot)
        .await
        .unwrap_or_else(|e| panic!("failed to bootstrap schema: {}", e));

    let app = app(store);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Drinks API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(store: DrinkStore) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/drinks", get(drinks::get_drinks));

    // One sub-router per permission scope so each guard names the scope it
    // enforces next to the route it protects
    let detail = guard(
        Scope::GetDrinksDetail,
        Router::new().route("/drinks-detail", get(drinks::get_drinks_detail)),
    );
    let create = guard(
        Scope::PostDrinks,
        Router::new().route("/drinks", post(drinks::post_drinks)),
    );
    let update = guard(
        Scope::PatchDrinks,
        Router::new().route("/drinks/:id", patch(drinks::patch_drinks)),
    );
    let remove = guard(
        Scope::DeleteDrinks,
        Router::new().route("/drinks/:id", delete(drinks::delete_drinks)),
    );

    Router::new()
        .merge(public)
        .merge(detail)
        .merge(create)
        .merge(update)
        .merge(remove)
        .fallback(not_found)
        .with_state(store)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Drinks API",
            "version": version,
            "description": "Drinks menu CRUD API with JWT scope-based authorization",
            "endpoints": {
                "drinks": "GET /drinks (public summary)",
                "drinks_detail": "GET /drinks-detail (requires get:drinks-detail)",
                "create": "POST /drinks (requires post:drinks)",
                "update": "PATCH /drinks/:id (requires patch:drinks)",
                "delete": "DELETE /drinks/:id (requires delete:drinks)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(store): axum::extract::State<DrinkStore>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match store.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("resource not found")
}
