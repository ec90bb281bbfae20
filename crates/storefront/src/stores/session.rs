use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::SessionStore;
use crate::api::{AccessToken, User};
use crate::storage::{AUTH_RECORD, DurableStorage, StorageError, load_json, save_json};

#[derive(Serialize, Deserialize)]
struct AuthRecord {
    user: Option<User>,
    access_token: Option<String>,
}

/// Session mirrored to the `auth-storage` record.
pub struct PersistentSession {
    auth: Option<(User, AccessToken)>,
    storage: Arc<dyn DurableStorage>,
}

impl PersistentSession {
    /// Hydrate the session from storage.
    ///
    /// A record that is unreadable, corrupt, or missing either half of the
    /// credentials is discarded and the session starts signed out.
    #[must_use]
    pub fn load(storage: Arc<dyn DurableStorage>) -> Self {
        let auth = match load_json::<AuthRecord>(storage.as_ref(), AUTH_RECORD) {
            Ok(Some(AuthRecord {
                user: Some(user),
                access_token: Some(token),
            })) if !token.trim().is_empty() => Some((user, AccessToken::new(token))),
            Ok(Some(_)) => {
                tracing::warn!("Discarding incomplete session record");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session record");
                None
            }
        };
        tracing::debug!(authenticated = auth.is_some(), "Session hydrated");

        Self { auth, storage }
    }

    fn persist(&self, user: &User, token: &AccessToken) -> Result<(), StorageError> {
        let record = AuthRecord {
            user: Some(user.clone()),
            access_token: Some(token.expose().to_string()),
        };
        save_json(self.storage.as_ref(), AUTH_RECORD, &record)
    }
}

impl SessionStore for PersistentSession {
    fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|(user, _)| user)
    }

    fn access_token(&self) -> Option<&AccessToken> {
        self.auth.as_ref().map(|(_, token)| token)
    }

    fn set_auth(&mut self, user: User, token: AccessToken) -> Result<(), StorageError> {
        // A blank token would not survive hydration; never hold one
        if token.is_empty() {
            tracing::warn!(user_id = %user.id, "Ignoring blank access token; signing out");
            return self.logout();
        }
        self.persist(&user, &token)?;
        tracing::debug!(user_id = %user.id, "Session started");
        self.auth = Some((user, token));
        Ok(())
    }

    fn set_user(&mut self, user: User) -> Result<(), StorageError> {
        let Some((_, token)) = &self.auth else {
            return Ok(());
        };
        self.persist(&user, token)?;
        if let Some((current, _)) = &mut self.auth {
            *current = user;
        }
        Ok(())
    }

    fn logout(&mut self) -> Result<(), StorageError> {
        self.storage.remove(AUTH_RECORD)?;
        if let Some((user, _)) = self.auth.take() {
            tracing::debug!(user_id = %user.id, "Session cleared");
        }
        Ok(())
    }
}
