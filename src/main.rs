use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use bootcamp_api::config::AppConfig;
use bootcamp_api::database::pool;
use bootcamp_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting bootcamp API in {:?} mode", config.environment);

    let db_pool = pool::connect(&config.database).await?;
    let port = config.server.port;
    let state = AppState::with_defaults(config, db_pool)?;

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Bootcamp API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Versioned API
        .merge(bootcamp_routes())
        .merge(course_routes())
        .merge(review_routes())
        .merge(auth_routes())
        .merge(user_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn bootcamp_routes() -> Router<AppState> {
    use bootcamp_api::handlers::{bootcamps, courses, reviews};

    Router::new()
        .route(
            "/api/v1/bootcamps",
            get(bootcamps::list).post(bootcamps::create),
        )
        .route(
            "/api/v1/bootcamps/:id",
            get(bootcamps::get)
                .put(bootcamps::update)
                .delete(bootcamps::delete),
        )
        .route(
            "/api/v1/bootcamps/radius/:zipcode/:distance",
            get(bootcamps::within_radius),
        )
        // Nested child resources
        .route(
            "/api/v1/bootcamps/:id/courses",
            get(courses::list_for_bootcamp).post(courses::create_for_bootcamp),
        )
        .route(
            "/api/v1/bootcamps/:id/reviews",
            get(reviews::list_for_bootcamp).post(reviews::create_for_bootcamp),
        )
}

fn course_routes() -> Router<AppState> {
    use bootcamp_api::handlers::courses;

    Router::new()
        .route("/api/v1/courses", get(courses::list))
        .route(
            "/api/v1/courses/:id",
            get(courses::get).put(courses::update).delete(courses::delete),
        )
}

fn review_routes() -> Router<AppState> {
    use bootcamp_api::handlers::reviews;

    Router::new()
        .route("/api/v1/reviews", get(reviews::list))
        .route(
            "/api/v1/reviews/:id",
            get(reviews::get).put(reviews::update).delete(reviews::delete),
        )
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::{post, put};
    use bootcamp_api::handlers::auth;

    Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", get(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/auth/updatedetails", put(auth::update_details))
        .route("/api/v1/auth/updatepassword", put(auth::update_password))
        .route("/api/v1/auth/forgotpassword", post(auth::forgot_password))
        .route("/api/v1/auth/resetpassword/:token", put(auth::reset_password))
}

fn user_routes() -> Router<AppState> {
    use bootcamp_api::handlers::users;

    Router::new()
        .route("/api/v1/users", get(users::list).post(users::create))
        .route(
            "/api/v1/users/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Bootcamp API",
            "version": version,
            "description": "REST API for a coding bootcamp directory",
            "endpoints": {
                "bootcamps": "/api/v1/bootcamps",
                "courses": "/api/v1/courses",
                "reviews": "/api/v1/reviews",
                "auth": "/api/v1/auth",
                "users": "/api/v1/users (admin)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match pool::health_check(&state.pool).await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
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
            axum::response::Json(json!({
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
