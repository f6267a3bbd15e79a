use cryptotasks_core::SessionToken;

/// Session context for a request.
///
/// Carries the bearer token the client presented, if any. Whether it maps to
/// a logged-in user is up to the ledger.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    pub fn new(token: Option<SessionToken>) -> Self {
        Self { token }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }
}
