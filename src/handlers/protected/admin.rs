use axum::{extract::Path, Extension};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::User;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::policy::{authorize, Action};
use crate::storage::UserStore;

/// GET /api/admin/users - list all users (password hashes never serialize)
pub async fn users_list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<User>> {
    authorize(&user, Action::ManageUsers)?;

    let store = UserStore::new().await?;
    let users = store.list().await?;
    Ok(ApiResponse::success(users))
}

/// DELETE /api/admin/users/:id - admins only, and never their own account
pub async fn user_delete(
    Extension(user): Extension<AuthUser>,
    Path(target): Path<Uuid>,
) -> ApiResult<Value> {
    authorize(&user, Action::DeleteUser { target })?;

    let store = UserStore::new().await?;
    store.delete(target).await?;

    tracing::info!("user {} deleted by {}", target, user.username);
    Ok(ApiResponse::success(json!({
        "message": "User deleted successfully"
    })))
}
