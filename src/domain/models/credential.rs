use std::fmt;

use serde::{Deserialize, Serialize};

/// Value object representing an encoded password
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already encoded string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HashedPassword").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_hash() {
        let hash = HashedPassword::new("custom_pass#some_salt".to_string());
        let debug = format!("{:?}", hash);
        assert!(!debug.contains("custom_pass"));
        assert_eq!(hash.as_str(), "custom_pass#some_salt");
    }
}
