use axum::Extension;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::storage::UserStore;

/// GET /api/auth/whoami - the authenticated user's current record
pub async fn whoami(Extension(auth_user): Extension<AuthUser>) -> ApiResult<User> {
    let store = UserStore::new().await?;

    let user = store
        .get(auth_user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User no longer exists"))?;

    Ok(ApiResponse::success(user))
}
