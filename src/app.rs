use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::handlers::{protected, public};
use crate::middleware::auth::jwt_auth_middleware;

/// Assemble the full application router
pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        // Public hierarchy listings. Category creation shares the /api/cities
        // path, so its JWT guard is attached per-method.
        .route(
            "/api/cities",
            get(public::categories::cities_list).post(
                protected::categories::city_create
                    .layer(middleware::from_fn(jwt_auth_middleware)),
            ),
        )
        .route("/api/cities/:id/schools", get(public::categories::schools_list))
        .route("/api/schools/:id/semesters", get(public::categories::semesters_list))
        .route("/api/semesters/:id/groups", get(public::categories::groups_list))
        .route("/api/groups/:id/subjects", get(public::categories::subjects_list))
        .route("/api/subjects/:id/contents", get(public::contents::contents_by_subject))
        .route(
            "/api/contents/:id",
            get(public::contents::content_get).delete(
                protected::contents::content_delete
                    .layer(middleware::from_fn(jwt_auth_middleware)),
            ),
        )
        // Readable-path helpers
        .route("/api/navigate/:level/:slug", get(public::categories::navigate))
        .route("/api/browse", get(public::browse::browse_root))
        .route("/api/browse/*path", get(public::browse::browse_path))
        // Uploaded file serving
        .route("/uploads/:filename", get(public::files::serve_upload))
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn protected_routes() -> Router {
    // Uploads may carry a full-size PDF plus form fields
    let upload_body_limit = config::config().uploads.max_file_bytes + 64 * 1024;

    Router::new()
        .route("/api/auth/whoami", get(protected::auth::whoami))
        // Category management (admin)
        .route("/api/schools", post(protected::categories::school_create))
        .route("/api/semesters", post(protected::categories::semester_create))
        .route("/api/groups", post(protected::categories::group_create))
        .route("/api/subjects", post(protected::categories::subject_create))
        .route("/api/cities/:id", delete(protected::categories::city_delete))
        .route("/api/schools/:id", delete(protected::categories::school_delete))
        .route("/api/semesters/:id", delete(protected::categories::semester_delete))
        .route("/api/groups/:id", delete(protected::categories::group_delete))
        .route("/api/subjects/:id", delete(protected::categories::subject_delete))
        // Content upload and listings
        .route(
            "/api/contents",
            post(protected::contents::content_create)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/api/my-contents", get(protected::contents::my_contents))
        // Admin user management
        .route("/api/admin/users", get(protected::admin::users_list))
        .route("/api/admin/users/:id", delete(protected::admin::user_delete))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Campus Portal API",
            "version": version,
            "description": "University-community content portal backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "hierarchy": "/api/cities ... /api/subjects/:id/contents (public listings)",
                "browse": "/api/browse[/*path] (public - resolved browse listings)",
                "navigate": "/api/navigate/:level/:slug (public - slug resolution)",
                "contents": "/api/contents (protected - upload/delete)",
                "admin": "/api/admin/* (protected - admin role)",
                "uploads": "/uploads/:filename (public)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
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
