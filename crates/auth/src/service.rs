use std::sync::Arc;

use chrono::Utc;
use store::{Account, AccountView, Database};

use crate::error::{AuthError, Result};
use crate::jwt::{self, Claims};
use crate::password;

const MIN_PASSWORD_LEN: usize = 6;

/// Validates and appends accounts, and verifies credentials at login.
///
/// Email uniqueness is checked inside the store's critical section, so two
/// concurrent registrations for the same address cannot both land.
pub struct AccountRegistry {
    db: Arc<Database>,
    jwt_secret: String,
    token_expiry_seconds: i64,
}

impl AccountRegistry {
    pub fn new(db: Arc<Database>, jwt_secret: String, token_expiry_seconds: i64) -> Self {
        Self {
            db,
            jwt_secret,
            token_expiry_seconds,
        }
    }

    /// Register a new account and issue a token for it.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(AccountView, String)> {
        let name = name.trim().to_string();
        let email = email.trim().to_string();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "name, email and password are required".to_string(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if !is_valid_email(&email) {
            return Err(AuthError::Validation(
                "email address is not valid".to_string(),
            ));
        }

        // Hash outside the critical section; a conflict below just wastes
        // the work.
        let password_hash = password::hash_password(password)?;

        let account = self
            .db
            .update(move |store| {
                if store.accounts.iter().any(|a| a.email == email) {
                    return Err(AuthError::EmailTaken);
                }
                let account = Account {
                    id: store.next_account_id(),
                    name,
                    email,
                    password_hash,
                    created_at: Utc::now(),
                };
                store.accounts.push(account.clone());
                Ok(account)
            })
            .await?;

        let token = self.issue_for(&account)?;
        Ok((account.into(), token))
    }

    /// Verify credentials and issue a token.
    ///
    /// Unknown email and wrong password return the same error, so callers
    /// cannot enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<(AccountView, String)> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let store = self.db.load().await;
        let account = store
            .accounts
            .into_iter()
            .find(|a| a.email == email)
            .ok_or(AuthError::BadCredentials)?;

        if !password::verify_password(password, &account.password_hash) {
            return Err(AuthError::BadCredentials);
        }

        let token = self.issue_for(&account)?;
        Ok((account.into(), token))
    }

    fn issue_for(&self, account: &Account) -> Result<String> {
        let claims = Claims::new(
            account.id,
            account.email.clone(),
            account.name.clone(),
            self.token_expiry_seconds,
        );
        jwt::issue_token(&claims, &self.jwt_secret)
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::verify_token;
    use tempfile::TempDir;

    const SECRET: &str = "test-secret";

    fn registry_in(dir: &TempDir) -> AccountRegistry {
        let db = Arc::new(Database::new(dir.path().join("db.json")));
        AccountRegistry::new(db, SECRET.to_string(), 3600)
    }

    #[tokio::test]
    async fn register_then_login() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let (user, token) = registry
            .register("Ada", "ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada");

        let (logged_in, _token) = registry
            .login("ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        registry
            .register("Ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let err = registry
            .register("Other Ada", "ada@example.com", "different456")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn rejects_malformed_registrations() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        let cases = [
            ("", "ada@example.com", "password123"),
            ("Ada", "", "password123"),
            ("Ada", "ada@example.com", ""),
            ("Ada", "ada@example.com", "abc"),
            ("Ada", "not-an-email", "password123"),
            ("Ada", "ada@nodot", "password123"),
            ("Ada", "a da@example.com", "password123"),
        ];
        for (name, email, password) in cases {
            let err = registry.register(name, email, password).await.unwrap_err();
            assert!(
                matches!(err, AuthError::Validation(_)),
                "{name:?}/{email:?}/{password:?}"
            );
        }
    }

    #[tokio::test]
    async fn email_matching_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        registry
            .register("Ada", "Ada@example.com", "password123")
            .await
            .unwrap();

        // A different casing is a different address as stored.
        registry
            .register("Ada", "ada@example.com", "password123")
            .await
            .unwrap();
        let err = registry
            .login("ADA@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let dir = TempDir::new().unwrap();
        let registry = registry_in(&dir);

        registry
            .register("Ada", "ada@example.com", "password123")
            .await
            .unwrap();

        let unknown = registry
            .login("nobody@example.com", "password123")
            .await
            .unwrap_err();
        let wrong = registry
            .login("ada@example.com", "wrongpass1")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::BadCredentials));
        assert!(matches!(wrong, AuthError::BadCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn concurrent_registrations_for_same_email_yield_one_account() {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(registry_in(&dir));

        let a = {
            let registry = registry.clone();
            async move {
                registry
                    .register("Ada", "ada@example.com", "password123")
                    .await
            }
        };
        let b = {
            let registry = registry.clone();
            async move {
                registry
                    .register("Ada Again", "ada@example.com", "password456")
                    .await
            }
        };

        let (first, second) = tokio::join!(a, b);
        let successes = [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        assert_eq!(successes, 1);
    }
}
