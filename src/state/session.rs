//! Session store: who is using this client right now.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` exists per application instance and is shared by `Arc`.
//! Navigation, route gating and every identity-aware flow read it; the login
//! and logout flows are the only writers besides startup resolution.
//!
//! ORDERING
//! ========
//! Every mutation attempt (`resolve`, `set`, `clear`) takes the next number
//! from a sequence counter. `resolve` drops the lock while its identity
//! round-trip is in flight and, on return, only applies its result if no
//! newer attempt has started in the meantime. A slow startup resolution can
//! therefore never overwrite a login or logout that happened after it began.
//!
//! Storage reads and writes happen under the sequence lock so the persisted
//! token changes in the same order as the published session. `TokenStorage`
//! calls are synchronous; the file backend does small blocking `std::fs`
//! operations on the calling task. Stores shared by many tasks on a busy
//! runtime should wrap a slow backend in `tokio::task::spawn_blocking`.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error. Identity failures fail closed to the
//! anonymous session and storage failures are logged; callers observe the
//! result through [`SessionStore::subscribe`] or [`SessionStore::current`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use super::storage::TokenStorage;
use crate::net::{ApiError, Identity, IdentityProvider};

// =============================================================================
// SESSION
// =============================================================================

/// Identity and admin capability of the current principal.
///
/// Fields are private so `is_admin` can never be true without a user id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
    is_admin: bool,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated session. A blank `user_id` yields the anonymous session.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>, is_admin: bool) -> Self {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Self::anonymous();
        }
        Self { user_id: Some(user_id), is_admin }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

impl From<&Identity> for Session {
    fn from(identity: &Identity) -> Self {
        Self::authenticated(identity.id.clone(), identity.is_admin)
    }
}

/// How a call to [`SessionStore::resolve`] ended. Informational only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The persisted token belongs to a valid principal.
    Resolved,
    /// No token was persisted; no request was made.
    Anonymous,
    /// The identity endpoint answered but recognized no user, or refused the
    /// token with a 4xx status.
    Rejected,
    /// Transport failure, server error or malformed response.
    Failed,
    /// A newer mutation started while this one was in flight; result dropped.
    Superseded,
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn TokenStorage>,
    /// Number of the most recent mutation attempt.
    seq: Mutex<u64>,
    session: watch::Sender<Session>,
}

impl SessionStore {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityProvider>, storage: Arc<dyn TokenStorage>) -> Self {
        let (session, _) = watch::channel(Session::anonymous());
        Self { identity, storage, seq: Mutex::new(0), session }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Receiver notified whenever the session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// The persisted bearer token, if any. Read failures count as absent.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted token");
                None
            }
        }
    }

    /// Rebuild the session from the persisted token.
    ///
    /// Never fails: every error path ends in the anonymous session. A stale
    /// token is left in storage.
    pub async fn resolve(&self) -> ResolveOutcome {
        let (ticket, token) = {
            let mut seq = self.lock_seq();
            *seq += 1;
            match self.token() {
                Some(token) => (*seq, token),
                None => {
                    self.publish(Session::anonymous());
                    tracing::debug!("no persisted token; session is anonymous");
                    return ResolveOutcome::Anonymous;
                }
            }
        };

        let result = self.identity.fetch_identity(&token).await;

        let seq = self.lock_seq();
        if *seq != ticket {
            tracing::debug!(ticket, latest = *seq, "discarding superseded session resolution");
            return ResolveOutcome::Superseded;
        }

        let outcome = match result {
            Ok(Some(identity)) => {
                tracing::info!(user_id = %identity.id, is_admin = identity.is_admin, "session resolved");
                self.publish(Session::from(&identity));
                ResolveOutcome::Resolved
            }
            Ok(None) => {
                tracing::info!("identity endpoint returned no user; session is anonymous");
                self.publish(Session::anonymous());
                ResolveOutcome::Rejected
            }
            Err(e @ ApiError::Status { status: 400..=499, .. }) => {
                tracing::warn!(error = %e, "persisted token rejected; session is anonymous");
                self.publish(Session::anonymous());
                ResolveOutcome::Rejected
            }
            Err(e) => {
                tracing::warn!(error = %e, "session resolution failed; session is anonymous");
                self.publish(Session::anonymous());
                ResolveOutcome::Failed
            }
        };
        drop(seq);
        outcome
    }

    /// Persist `token` and adopt the given identity.
    ///
    /// The caller must already have confirmed the token with the identity
    /// service; nothing is validated here. A blank `user_id` cannot form a
    /// session, so the store is cleared instead and nothing is persisted.
    pub fn set(&self, token: &str, user_id: &str, is_admin: bool) {
        let mut seq = self.lock_seq();
        *seq += 1;
        let session = Session::authenticated(user_id, is_admin);
        if !session.is_authenticated() {
            tracing::warn!("set called without a user id; clearing session instead");
            self.erase_token();
            self.publish(session);
            return;
        }
        if let Err(e) = self.storage.store(token) {
            tracing::warn!(error = %e, "failed to persist token; session will not survive a restart");
        }
        self.publish(session);
        tracing::info!(user_id, is_admin, "session set");
    }

    /// Forget the persisted token and reset to anonymous. Idempotent.
    pub fn clear(&self) {
        let mut seq = self.lock_seq();
        *seq += 1;
        self.erase_token();
        self.publish(Session::anonymous());
        tracing::info!("session cleared");
    }

    fn erase_token(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to erase persisted token");
        }
    }

    fn lock_seq(&self) -> MutexGuard<'_, u64> {
        self.seq
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Callers hold the sequence lock so publication order matches `seq` order.
    fn publish(&self, next: Session) {
        self.session.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
