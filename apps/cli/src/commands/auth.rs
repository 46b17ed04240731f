//! Registration and login.

use tracing::{info, warn};

use histopedia_core::validation::{validate_email, validate_password, validate_username};
use histopedia_core::{User, UserFactory};
use histopedia_db::credentials::hash_password;
use histopedia_db::Database;

use crate::error::{AppError, AppResult};

/// Input of the Register option.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email_address: String,
    pub password: String,
}

/// Creates a patron account.
///
/// ## Errors
/// * `AppError::Validation` - a field breaks the account rules
/// * `AppError::EmailTaken` - the email already has an account
pub async fn register(db: &Database, registration: Registration) -> AppResult<User> {
    validate_username(&registration.username)?;
    validate_email(&registration.email_address)?;
    validate_password(&registration.password)?;

    let users = db.users();
    if users.email_exists(&registration.email_address).await? {
        return Err(AppError::EmailTaken(registration.email_address));
    }

    let id = users.next_id().await?;
    let user = UserFactory::Patron.create(
        id,
        registration.username,
        registration.email_address,
        hash_password(&registration.password)?,
    );
    users.insert(&user).await?;

    info!(user_id = %user.id, "Patron registered");
    Ok(user)
}

/// Checks credentials. `Ok(None)` for an unknown email or a wrong password.
pub async fn login(db: &Database, email: &str, password: &str) -> AppResult<Option<User>> {
    let user = db.users().find_by_credentials(email.trim(), password).await?;

    match &user {
        Some(user) => info!(user_id = %user.id, role = %user.access_level, "Logged in"),
        None => warn!("Rejected login attempt"),
    }

    Ok(user)
}
