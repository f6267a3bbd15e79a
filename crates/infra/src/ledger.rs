//! Shared balance ledger: users, the tap pool, and session identities.
//!
//! Every read and write goes through one mutex. Mutations persist the snapshot
//! through the `PersistenceGateway` before the lock is released, so the only
//! data-loss window is a crash between the in-memory update and the save.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use cryptotasks_core::{DomainError, DomainResult, SessionToken, TAP_QUANTUM, User};

use crate::persistence::{PersistenceError, PersistenceGateway, Snapshot};

/// Hours a login stays valid without any activity.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
struct Identity {
    username: String,
    last_seen: DateTime<Utc>,
}

#[derive(Debug)]
struct LedgerState {
    data: Snapshot,
    /// Authenticated sessions: token -> username and last activity.
    identities: HashMap<SessionToken, Identity>,
    session_ttl: TimeDelta,
}

impl LedgerState {
    fn bind(&mut self, username: &str, now: DateTime<Utc>) -> SessionToken {
        self.evict_idle(now);
        let token = SessionToken::new();
        self.identities.insert(
            token,
            Identity {
                username: username.to_string(),
                last_seen: now,
            },
        );
        token
    }

    /// Username behind `token`, refreshing its activity. Expired tokens are
    /// dropped and resolve to nothing.
    fn resolve(&mut self, token: &SessionToken, now: DateTime<Utc>) -> Option<String> {
        let ttl = self.session_ttl;
        let identity = self.identities.get_mut(token)?;
        if now - identity.last_seen >= ttl {
            self.identities.remove(token);
            return None;
        }
        identity.last_seen = now;
        Some(identity.username.clone())
    }

    fn evict_idle(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.session_ttl;
        let before = self.identities.len();
        self.identities.retain(|_, id| now - id.last_seen < ttl);
        before - self.identities.len()
    }
}

/// A user record together with the pool balance, read under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub user: User,
    pub pool_balance: Decimal,
}

pub struct BalanceLedger {
    state: Mutex<LedgerState>,
    gateway: Arc<dyn PersistenceGateway>,
}

impl core::fmt::Debug for BalanceLedger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BalanceLedger").finish_non_exhaustive()
    }
}

impl BalanceLedger {
    /// Build the ledger from whatever the gateway has stored.
    ///
    /// A missing or unreadable snapshot is not fatal: the ledger starts empty.
    pub fn open(gateway: Arc<dyn PersistenceGateway>) -> Self {
        let data = match gateway.load() {
            Ok(snapshot) => {
                info!(
                    users = snapshot.users.len(),
                    tap_balance = %snapshot.tap_balance,
                    "ledger snapshot loaded"
                );
                snapshot
            }
            Err(PersistenceError::Missing) => {
                info!("no ledger snapshot found; starting empty");
                Snapshot::default()
            }
            Err(e) => {
                warn!(error = %e, "failed to load ledger snapshot; starting empty");
                Snapshot::default()
            }
        };

        Self {
            state: Mutex::new(LedgerState {
                data,
                identities: HashMap::new(),
                session_ttl: TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS),
            }),
            gateway,
        }
    }

    /// Override how long an idle login stays valid.
    pub fn with_session_ttl(self, ttl: TimeDelta) -> Self {
        self.lock().session_ttl = ttl;
        self
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Save while the caller still holds the lock. Failures are logged and
    /// swallowed; the in-memory change stands.
    fn persist(&self, data: &Snapshot) {
        if let Err(e) = self.gateway.save(data) {
            warn!(error = %e, "failed to persist ledger snapshot");
        }
    }

    /// Log in an existing user.
    ///
    /// Any non-empty credential is accepted. Existing sessions are left as
    /// they are on failure.
    pub fn authenticate(&self, username: &str, credential: &str) -> DomainResult<SessionToken> {
        self.authenticate_at(username, credential, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        username: &str,
        credential: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<SessionToken> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let user = state
            .data
            .users
            .get_mut(username)
            .ok_or(DomainError::InvalidCredentials)?;
        if credential.is_empty() {
            return Err(DomainError::InvalidCredentials);
        }
        user.is_guest = false;

        let token = state.bind(username, now);
        self.persist(&state.data);

        info!(username, "user logged in");
        Ok(token)
    }

    /// Create a user with the registration bonus and log them in.
    pub fn register(&self, username: &str) -> DomainResult<SessionToken> {
        self.register_at(username, Utc::now())
    }

    pub fn register_at(&self, username: &str, now: DateTime<Utc>) -> DomainResult<SessionToken> {
        let mut guard = self.lock();
        let state = &mut *guard;

        if state.data.users.contains_key(username) {
            return Err(DomainError::duplicate_user(username));
        }
        let user = User::register(username, now)?;
        state.data.users.insert(username.to_string(), user);

        let token = state.bind(username, now);
        self.persist(&state.data);

        info!(username, "user registered");
        Ok(token)
    }

    /// Forget a session. Unknown tokens are ignored.
    pub fn logout(&self, token: &SessionToken) {
        if let Some(identity) = self.lock().identities.remove(token) {
            info!(username = %identity.username, "user logged out");
        }
    }

    /// Credit one tap to the pool and to the session's user.
    ///
    /// Returns the pool balance right after this tap.
    pub fn tap(&self, token: &SessionToken) -> DomainResult<Decimal> {
        self.tap_at(token, Utc::now())
    }

    pub fn tap_at(&self, token: &SessionToken, now: DateTime<Utc>) -> DomainResult<Decimal> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let user = state
            .resolve(token, now)
            .and_then(|name| state.data.users.get_mut(&name))
            .ok_or(DomainError::Unauthenticated)?;
        user.credit_tap();
        state.data.tap_balance += TAP_QUANTUM;
        let balance = state.data.tap_balance;

        self.persist(&state.data);
        debug!(balance = %balance, "tap");
        Ok(balance)
    }

    /// Zero the pool. Callers decide who may do this.
    pub fn reset_pool(&self) {
        let mut state = self.lock();
        state.data.tap_balance = Decimal::ZERO;
        self.persist(&state.data);
        info!("tap pool reset");
    }

    pub fn current_balance(&self) -> Decimal {
        self.lock().data.tap_balance
    }

    /// Username bound to `token`, if any.
    pub fn identity(&self, token: &SessionToken) -> Option<String> {
        self.lock().resolve(token, Utc::now())
    }

    /// The session's user plus the pool balance.
    pub fn account(&self, token: &SessionToken) -> DomainResult<AccountView> {
        let mut state = self.lock();
        let user = state
            .resolve(token, Utc::now())
            .and_then(|name| state.data.users.get(&name))
            .cloned()
            .ok_or(DomainError::Unauthenticated)?;
        Ok(AccountView {
            user,
            pool_balance: state.data.tap_balance,
        })
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.lock().data.users.get(username).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.lock().data.users.len()
    }

    /// Drop logins idle for the session TTL or longer; returns how many.
    pub fn expire_sessions(&self) -> usize {
        self.expire_sessions_at(Utc::now())
    }

    pub fn expire_sessions_at(&self, now: DateTime<Utc>) -> usize {
        let removed = self.lock().evict_idle(now);
        if removed > 0 {
            debug!(removed, "expired idle logins");
        }
        removed
    }

    /// Number of live logins.
    pub fn session_count(&self) -> usize {
        self.lock().identities.len()
    }
}
