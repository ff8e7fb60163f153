//! Admin capability check.
//!
//! The embedding host asserts the caller identity; nothing here verifies it.

use std::collections::HashSet;

pub trait AdminGate: Send + Sync {
    fn is_admin(&self, identity: &str) -> bool;
}

/// Any `Fn(&str) -> bool` can act as a gate.
impl<F> AdminGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_admin(&self, identity: &str) -> bool {
        self(identity)
    }
}

/// Fixed set of admin usernames, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    admins: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admins: usernames
                .into_iter()
                .map(|u| u.as_ref().trim().to_lowercase())
                .filter(|u| !u.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}

impl AdminGate for AllowList {
    fn is_admin(&self, identity: &str) -> bool {
        let identity = identity.trim();
        !identity.is_empty() && self.admins.contains(&identity.to_lowercase())
    }
}
