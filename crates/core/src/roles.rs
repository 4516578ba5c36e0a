//! Well-known role name constants.
//!
//! Users carry an `is_admin` flag; the role name is what ends up in the
//! access-token claims.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Resolve the role name for a user's admin flag.
pub fn role_for(is_admin: bool) -> &'static str {
    if is_admin {
        ROLE_ADMIN
    } else {
        ROLE_USER
    }
}
