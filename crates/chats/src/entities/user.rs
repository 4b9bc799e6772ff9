use serde::{Deserialize, Serialize};

use crate::types::{ChatError, UserId};
use crate::utils::Validator;

/// A user as returned by the directory. Creation happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Avatar reference (picture URL)
    #[serde(default, alias = "picture", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            email: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Validate a user received from the directory
    pub fn validate(&self) -> Result<(), ChatError> {
        Validator::identifier("User", &self.id)
    }
}
