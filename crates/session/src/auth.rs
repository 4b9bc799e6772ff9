//! Identity of the signed-in user.

use std::fmt;

use chitchat_chats::User;

/// Opaque token the backend issued at sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value, for placing into request headers
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// The user a session runs on behalf of.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user: User,
    pub token: AuthToken,
}

impl SessionUser {
    pub fn new(user: User, token: AuthToken) -> Self {
        Self { user, token }
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let session = SessionUser::new(User::new("u1", "Alice"), AuthToken::new("secret-value"));
        let rendered = format!("{session:?}");

        assert!(!rendered.contains("secret-value"));
        assert!(rendered.contains("AuthToken(***)"));
        assert_eq!(session.token.expose(), "secret-value");
        assert_eq!(session.id(), "u1");
    }
}
