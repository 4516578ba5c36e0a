//! Startup admin account.

use folio_db::models::user::CreateUser;
use folio_db::repositories::UserRepo;
use folio_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::AdminSeed;
use crate::error::{AppError, AppResult};

/// Make sure an admin account exists for `seed.email`.
///
/// An existing account with that email is left as it is, password included.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> AppResult<()> {
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let input = CreateUser {
        name: "Admin".to_string(),
        email: seed.email.clone(),
        password_hash,
        is_admin: true,
    };

    let (user, created) = UserRepo::ensure(pool, &input).await?;
    if created {
        tracing::info!(user_id = user.id, email = %user.email, "Admin account created");
    } else {
        tracing::debug!(user_id = user.id, "Admin account already present");
    }
    Ok(())
}
