use std::sync::Arc;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{
    claims::Principal,
    denylist::TokenDenylist,
    dto::SignupRequest,
    extractors::bearer_token,
    jwt::{JwtKeys, TokenError},
    password::{hash_password, verify_password, PasswordError},
    repo::UserStore,
    repo_types::{NewUser, User},
};
use crate::error::{AppError, AppResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Credential storage, token issuance, verification and revocation.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    denylist: Arc<dyn TokenDenylist>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, denylist: Arc<dyn TokenDenylist>, keys: JwtKeys) -> Self {
        Self {
            users,
            denylist,
            keys,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn denylist(&self) -> &Arc<dyn TokenDenylist> {
        &self.denylist
    }

    /// Uniqueness is left to the store; a taken email surfaces as `Conflict`.
    pub async fn signup(&self, req: SignupRequest) -> AppResult<i64> {
        let email = normalize_email(&req.email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AppError::bad_request("Invalid email"));
        }
        if req.password.is_empty() {
            return Err(AppError::bad_request("Password is required"));
        }

        let hashed_password = hash_password(&req.password)?;
        let id = self
            .users
            .insert(NewUser {
                email: email.clone(),
                name: req.name,
                address: req.address,
                hashed_password,
            })
            .await?;

        info!(user_id = id, %email, "user registered");
        Ok(id)
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let email = normalize_email(email);
        let user = match self.users.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(%email, "login unknown email");
                return Err(invalid_credentials());
            }
        };

        match verify_password(password, &user.hashed_password) {
            Ok(true) => {}
            Ok(false) => {
                warn!(%email, user_id = user.id, "login invalid password");
                return Err(invalid_credentials());
            }
            Err(e @ PasswordError::Unreadable(_)) => {
                error!(error = %e, user_id = user.id, "stored hash unreadable");
                return Err(invalid_credentials());
            }
            Err(e) => return Err(e.into()),
        }

        let (token, _) = self.keys.sign(user.id, &user.email)?;
        info!(user_id = user.id, "user logged in");
        Ok(token)
    }

    pub async fn authorize(&self, header: Option<&str>) -> AppResult<Principal> {
        self.authorize_at(header, OffsetDateTime::now_utc()).await
    }

    pub async fn authorize_at(&self, header: Option<&str>, now: OffsetDateTime) -> AppResult<Principal> {
        let token = bearer_token(header)?;
        let claims = self.keys.verify_at(token, now)?;
        if self.denylist.is_revoked(claims.jti).await? {
            warn!(user_id = claims.sub, jti = %claims.jti, "revoked token presented");
            return Err(TokenError::Revoked.into());
        }
        let principal = Principal::try_from(claims).map_err(|_| TokenError::Invalid)?;
        Ok(principal)
    }

    /// Revokes the presented token until its natural expiry.
    pub async fn logout(&self, principal: &Principal) -> AppResult<()> {
        self.denylist
            .revoke(principal.jti, principal.expires_at)
            .await
            .context("revoke token")?;
        info!(user_id = principal.id, jti = %principal.jti, "user logged out");
        Ok(())
    }

    pub async fn profile(&self, principal: &Principal) -> AppResult<User> {
        self.users
            .get_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::bad_request("User not found"))
    }
}

fn invalid_credentials() -> AppError {
    AppError::bad_request("Invalid credentials")
}
