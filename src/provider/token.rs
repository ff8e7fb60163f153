//! Process-wide cache for the provider's bearer credential.
//!
//! Tokens are immutable values with an explicit expiry; a refresh swaps in a
//! new value. Two callers racing past a stale token both refresh, which costs
//! one extra round trip and nothing else.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

/// Tokens this close to expiry are treated as expired.
pub const REFRESH_MARGIN_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn issued(value: impl Into<String>, expires_in_secs: i64, now: DateTime<Utc>) -> Self {
        Self::new(value, now + Duration::seconds(expires_in_secs))
    }

    pub fn secret(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct TokenCache {
    current: RwLock<Option<Arc<AccessToken>>>,
}

impl TokenCache {
    /// The cached token, unless it is absent or inside the refresh margin.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<Arc<AccessToken>> {
        let current = self.current.read().unwrap_or_else(|e| e.into_inner());
        current.as_ref().filter(|t| t.is_fresh(now)).cloned()
    }

    pub fn store(&self, token: AccessToken) -> Arc<AccessToken> {
        let token = Arc::new(token);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(token.clone());
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_inside_margin_is_stale() {
        let now = Utc::now();
        let token = AccessToken::issued("abc", REFRESH_MARGIN_SECS, now);
        assert!(!token.is_fresh(now));

        let token = AccessToken::issued("abc", REFRESH_MARGIN_SECS + 60, now);
        assert_eq!(token.expires_at(), now + Duration::seconds(REFRESH_MARGIN_SECS + 60));
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + Duration::seconds(61)));
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = TokenCache::default();
        assert!(cache.fresh(Utc::now()).is_none());
    }

    #[test]
    fn test_cache_returns_stored_token_until_stale() {
        let cache = TokenCache::default();
        let now = Utc::now();
        cache.store(AccessToken::issued("abc", 3600, now));

        assert_eq!(cache.fresh(now).unwrap().secret(), "abc");
        assert!(cache.fresh(now + Duration::seconds(3600 - 200)).is_none());
    }

    #[test]
    fn test_store_replaces_previous_token() {
        let cache = TokenCache::default();
        let now = Utc::now();
        let first = cache.store(AccessToken::issued("first", 3600, now));
        cache.store(AccessToken::issued("second", 3600, now));

        assert_eq!(first.secret(), "first");
        assert_eq!(cache.fresh(now).unwrap().secret(), "second");
    }
}
