use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::error::{PortalError, Result};
use crate::model::role::Role;

use super::jwt::{Claims, read_claims};
use super::token_store::TokenStore;

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub role: Role,
    pub name: Option<String>,
    pub email: Option<String>,
    pub exp: Option<i64>,
    token: String,
}

impl CurrentUser {
    fn from_token(token: String) -> Result<Self> {
        let claims: Claims = read_claims(&token)
            .map_err(|e| PortalError::validation(format!("Invalid session token: {e}")))?;

        if claims.is_expired() {
            return Err(PortalError::Unauthorized);
        }

        Ok(Self {
            id: claims.id,
            role: claims.role,
            name: claims.name,
            email: claims.email,
            exp: claims.exp,
            token,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// The signed-in user for this process.
///
/// Loaded once at start-up, replaced on login, cleared on logout or as soon as
/// the backend answers 401. Views get it handed in; nothing re-reads the token
/// store on its own.
pub struct Session {
    store: Box<dyn TokenStore>,
    current: RwLock<Option<CurrentUser>>,
}

impl Session {
    /// Restores the stored session, discarding a token that is unreadable or expired.
    pub fn load(store: Box<dyn TokenStore>) -> Result<Self> {
        let current = match store.load()? {
            Some(token) => match CurrentUser::from_token(token) {
                Ok(user) => {
                    debug!(user_id = %user.id, role = %user.role, "session restored");
                    Some(user)
                }
                Err(e) => {
                    warn!(error = %e, "discarding stored session");
                    store.clear()?;
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    /// Adopts a freshly issued token.
    pub fn establish(&self, token: String) -> Result<CurrentUser> {
        let user = CurrentUser::from_token(token)?;
        self.store.save(user.token())?;
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());

        info!(user_id = %user.id, role = %user.role, "session established");
        Ok(user)
    }

    pub fn clear(&self) -> Result<()> {
        let previous = self.current.write().unwrap_or_else(|e| e.into_inner()).take();
        self.store.clear()?;

        if let Some(user) = previous {
            info!(user_id = %user.id, "session cleared");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<CurrentUser> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|u| u.token.clone())
    }

    pub fn require(&self) -> Result<CurrentUser> {
        self.current().ok_or(PortalError::NotLoggedIn)
    }

    pub fn require_role(&self, role: Role) -> Result<CurrentUser> {
        let user = self.require()?;
        if user.role == role {
            Ok(user)
        } else {
            Err(PortalError::Forbidden(role))
        }
    }

    pub fn require_admin(&self) -> Result<CurrentUser> {
        self.require_role(Role::Admin)
    }
}
