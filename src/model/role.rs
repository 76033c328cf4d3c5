use crate::utils::constants::{PROVIDER_LABEL, REQUESTER_LABEL};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Requester,
    Provider,
}

impl Role {
    /// The pool this role is matched against.
    pub fn opposite(self) -> Self {
        match self {
            Role::Requester => Role::Provider,
            Role::Provider => Role::Requester,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Requester => REQUESTER_LABEL,
            Role::Provider => PROVIDER_LABEL,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            REQUESTER_LABEL => Some(Role::Requester),
            PROVIDER_LABEL => Some(Role::Provider),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Requester => write!(f, "requester"),
            Role::Provider => write!(f, "provider"),
        }
    }
}
