//! Account service
//!
//! Signup and login orchestration: validates credentials, hashes and
//! verifies passwords, persists users and issues access tokens.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

use crate::auth::jwt::TokenService;
use crate::auth::password::PasswordHasher;
use crate::auth::store::UserStore;
use crate::error::{GatewayError, Result};

/// Minimum accepted password length, in characters.
const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Signup/login orchestration over the user store and token service.
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new account and return an access token for it.
    ///
    /// The lookup-then-insert pair is not atomic; two concurrent signups for
    /// the same email may both pass the lookup, and the store's unique
    /// constraint decides the loser.
    pub async fn signup(&self, email: &str, password: &str) -> Result<String> {
        validate_email(email)?;
        validate_password(password)?;

        if self.store.find_by_email(email).await?.is_some() {
            warn!("signup rejected, email already registered: {email}");
            return Err(GatewayError::UserAlreadyExists);
        }

        let password_hash = self.hasher.hash(password)?;
        self.store.insert(email, &password_hash).await?;

        info!("user registered: {email}");
        self.tokens.issue(email, None)
    }

    /// Authenticate an existing account and return a fresh access token.
    ///
    /// An unknown email and a wrong password produce the identical error so
    /// the response never reveals which one it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let Some(user) = self.store.find_by_email(email).await? else {
            warn!("login failed for {email}");
            return Err(GatewayError::InvalidCredentials);
        };

        // A verification error (e.g. a malformed stored hash) collapses into
        // the same uniform failure as a mismatch.
        match self.hasher.verify(password, &user.password_hash) {
            Ok(true) => {}
            _ => {
                warn!("login failed for {email}");
                return Err(GatewayError::InvalidCredentials);
            }
        }

        info!("user logged in: {email}");
        self.tokens.issue(email, None)
    }
}

fn validate_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(GatewayError::validation("Invalid email address"))
    }
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(GatewayError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
