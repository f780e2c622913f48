//! Request-scoped caller context.

use crate::UserId;

/// Authenticated session for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    email: String,
}

impl Session {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Context carried through every domain operation.
///
/// This is immutable and must be present for all account operations; the
/// transport layer constructs it once per request (after authentication) and
/// never from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    session: Session,
}

impl RequestContext {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
