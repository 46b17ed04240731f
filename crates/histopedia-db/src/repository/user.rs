//! # User Repository
//!
//! Accounts and credential checks.
//!
//! Users are created at registration (patrons) or by the `seed` tool
//! (librarians) and are never updated or deleted.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use histopedia_core::ids::{self, IdKind};
use histopedia_core::{User, UserFactory};

use crate::credentials::verify_password;
use crate::error::{DbError, DbResult};

const SELECT_USER: &str = "SELECT id, access_level, username, email_address, password FROM users";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    access_level: i64,
    username: String,
    email_address: String,
    password: String,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let factory = UserFactory::for_discriminant(row.access_level)
            .map_err(|e| DbError::corrupt_row("users", &row.id, e))?;

        Ok(factory.create(row.id, row.username, row.email_address, row.password))
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists every account, ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        debug!("Listing all users");

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{} ORDER BY LENGTH(id), id",
            SELECT_USER
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<User>> {
        debug!(id = %id, "Finding user by id");

        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = ?1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Finding user by email");

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE email_address = ?1",
            SELECT_USER
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Looks up the account for a login attempt.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - Email exists and the password matches its hash
    /// * `Ok(None)` - Unknown email or wrong password (indistinguishable to
    ///   the caller)
    pub async fn find_by_credentials(&self, email: &str, password: &str) -> DbResult<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            debug!(email = %email, "Login for unknown email");
            return Ok(None);
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            warn!(user_id = %user.id, "Password mismatch");
            Ok(None)
        }
    }

    /// Whether an account already uses this email address.
    pub async fn email_exists(&self, email: &str) -> DbResult<bool> {
        let matches: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email_address = ?1")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(matches > 0)
    }

    /// The account with the numerically greatest id.
    pub async fn find_latest(&self) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
            SELECT_USER
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// The id the next registered account should get.
    pub async fn next_id(&self) -> DbResult<String> {
        let latest = self.find_latest().await?;
        Ok(ids::next_id(
            IdKind::User,
            latest.as_ref().map(|u| u.id.as_str()),
        )?)
    }

    /// Inserts a new account. `user.password_hash` must already be hashed.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the email address is taken.
    pub async fn insert(&self, user: &User) -> DbResult<bool> {
        debug!(id = %user.id, role = %user.access_level, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, access_level, username, email_address, password)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(user.access_level.as_i64())
        .bind(&user.username)
        .bind(&user.email_address)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("email_address") => {
                DbError::duplicate("email address", &user.email_address)
            }
            other => other,
        })?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::hash_password;
    use crate::repository::test_support::{sample_user, test_db};
    use histopedia_core::AccessLevel;

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_db().await;
        let repo = db.users();
        let user = sample_user("UID0001", AccessLevel::Librarian);

        assert!(repo.insert(&user).await.unwrap());

        let found = repo.find_by_id("UID0001").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(found.is_librarian());

        let by_email = repo.find_by_email(&user.email_address).await.unwrap();
        assert_eq!(by_email, Some(user));
        assert!(repo.find_by_email("ghost@histopedia.org").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_credentials_verify_hash() {
        let db = test_db().await;
        let repo = db.users();
        let hash = hash_password("napoleon1").unwrap();
        let patron = UserFactory::Patron.create("UID0001", "marie", "marie@lib.fr", hash);
        repo.insert(&patron).await.unwrap();

        let found = repo
            .find_by_credentials("marie@lib.fr", "napoleon1")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some("UID0001".to_string()));

        assert!(repo
            .find_by_credentials("marie@lib.fr", "napoleon2")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_credentials("nobody@lib.fr", "napoleon1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_db().await;
        let repo = db.users();
        let first = sample_user("UID0001", AccessLevel::Patron);
        repo.insert(&first).await.unwrap();

        assert!(repo.email_exists(&first.email_address).await.unwrap());
        assert!(!repo.email_exists("other@histopedia.org").await.unwrap());

        let mut second = sample_user("UID0002", AccessLevel::Patron);
        second.email_address = first.email_address.clone();
        let err = repo.insert(&second).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == &first.email_address));
    }

    #[tokio::test]
    async fn test_next_id() {
        let db = test_db().await;
        let repo = db.users();
        assert_eq!(repo.next_id().await.unwrap(), "UID0001");

        repo.insert(&sample_user("UID0001", AccessLevel::Librarian))
            .await
            .unwrap();
        repo.insert(&sample_user("UID0002", AccessLevel::Patron))
            .await
            .unwrap();

        assert_eq!(repo.next_id().await.unwrap(), "UID0003");
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
