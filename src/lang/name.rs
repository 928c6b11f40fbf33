// SPDX-License-Identifier: BSD-3-Clause
use std::fmt::Display;

use triomphe::Arc;

use super::InstId;

/// The name of a variable or of a storage location. Clones share the
/// underlying allocation, as names land in many points-to sets at once.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(Arc<String>);

impl Name {
    /// The static name of the location introduced by the allocation with
    /// ordinal `site`.
    pub fn reference(site: InstId) -> Self {
        Name(Arc::new(format!("ref_{site}")))
    }

    /// The dynamic name of the `serial`th cell minted at `site`.
    pub(crate) fn location(site: InstId, serial: usize) -> Self {
        Name(Arc::new(format!("ref_{site}_{serial}")))
    }

    pub fn get(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(Arc::new(s.to_string()))
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(Arc::new(s))
    }
}

impl<T> PartialEq<T> for Name
where
    T: AsRef<str>,
{
    fn eq(&self, other: &T) -> bool {
        self.0.as_str().eq(other.as_ref())
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
