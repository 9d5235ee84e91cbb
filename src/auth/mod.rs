//! # Auth Module
//!
//! Credential store and bearer-token sessions. The rest of the application
//! treats this as a black box that turns a credential into a user id:
//! registration and login live here, and every protected route resolves its
//! token through [`AuthService::authenticate`], which fails closed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod password;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::database::Database;

/// Minimum accepted password length, matching the registration form.
const MIN_PASSWORD_LEN: usize = 6;

/// A stored credential row.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
}

/// A session row joined with its user.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// The authenticated caller, as resolved from a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
}

/// A freshly issued login session.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user: AuthUser,
}

/// Registration, login, and token verification against the shared store.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    session_ttl_hours: i64,
}

impl AuthService {
    pub fn new(db: Database, session_ttl_hours: i64) -> Self {
        Self {
            db,
            session_ttl_hours,
        }
    }

    /// Create an account. Fails with a conflict when the email is taken.
    pub fn register(&self, email: &str, password: &str) -> Result<i64, AppError> {
        let email = email.trim();
        if email.is_empty() || password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(
                "Email is required and password must be at least 6 characters.".to_string(),
            ));
        }

        if self.db.find_user_by_email(email)?.is_some() {
            return Err(AppError::Conflict("A user with this email already exists."));
        }

        let user_id = self.db.insert_user(email, &password::hash_password(password))?;
        info!("Registered user {user_id} ({email})");
        Ok(user_id)
    }

    /// Verify credentials and issue an opaque session token.
    ///
    /// Wrong email and wrong password produce the same error, and expired
    /// sessions are pruned opportunistically on each successful login.
    pub fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required.".to_string(),
            ));
        }

        let user = self
            .db
            .find_user_by_email(email)?
            .filter(|user| password::verify_password(password, &user.password_hash))
            .ok_or(AppError::Unauthorized("Invalid email or password."))?;

        let now = Utc::now();
        let pruned = self.db.delete_expired_sessions(now)?;
        if pruned > 0 {
            debug!("Pruned {pruned} expired sessions");
        }

        let token = Uuid::new_v4().simple().to_string();
        self.db
            .insert_session(&token, user.user_id, now + Duration::hours(self.session_ttl_hours))?;
        info!("User {} logged in", user.user_id);

        Ok(IssuedToken {
            token,
            user: AuthUser {
                user_id: user.user_id,
                email: user.email,
            },
        })
    }

    /// Resolve a bearer token to its user, failing closed.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let session = self
            .db
            .session_user(token)?
            .ok_or(AppError::Forbidden("Invalid or expired token."))?;

        if session.expires_at <= Utc::now() {
            return Err(AppError::Forbidden("Invalid or expired token."));
        }

        Ok(AuthUser {
            user_id: session.user_id,
            email: session.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(Database::open_in_memory().unwrap(), 24)
    }

    #[test]
    fn test_register_login_authenticate_round_trip() {
        let auth = service();
        let user_id = auth.register("gardener@example.com", "hunter22").unwrap();

        let issued = auth.login("gardener@example.com", "hunter22").unwrap();
        assert_eq!(issued.user.user_id, user_id);

        let resolved = auth.authenticate(&issued.token).unwrap();
        assert_eq!(resolved.user_id, user_id);
        assert_eq!(resolved.email, "gardener@example.com");
    }

    #[test]
    fn test_register_validates_input() {
        let auth = service();
        assert!(matches!(
            auth.register("", "hunter22").unwrap_err(),
            AppError::InvalidInput(_)
        ));
        assert!(matches!(
            auth.register("gardener@example.com", "short").unwrap_err(),
            AppError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_register_duplicate_email_conflicts() {
        let auth = service();
        auth.register("gardener@example.com", "hunter22").unwrap();
        assert!(matches!(
            auth.register("gardener@example.com", "other-pass").unwrap_err(),
            AppError::Conflict(_)
        ));
    }

    #[test]
    fn test_login_wrong_password_and_unknown_email_look_alike() {
        let auth = service();
        auth.register("gardener@example.com", "hunter22").unwrap();

        let wrong_pass = auth
            .login("gardener@example.com", "wrong")
            .unwrap_err()
            .to_string();
        let unknown = auth
            .login("nobody@example.com", "hunter22")
            .unwrap_err()
            .to_string();
        assert_eq!(wrong_pass, unknown);
    }

    #[test]
    fn test_authenticate_rejects_garbage_token() {
        let auth = service();
        assert!(matches!(
            auth.authenticate("not-a-real-token").unwrap_err(),
            AppError::Forbidden(_)
        ));
    }

    #[test]
    fn test_expired_session_fails_closed() {
        // A negative TTL issues tokens that are already expired.
        let auth = AuthService::new(Database::open_in_memory().unwrap(), -1);
        auth.register("gardener@example.com", "hunter22").unwrap();
        let issued = auth.login("gardener@example.com", "hunter22").unwrap();

        assert!(matches!(
            auth.authenticate(&issued.token).unwrap_err(),
            AppError::Forbidden(_)
        ));
    }
}
