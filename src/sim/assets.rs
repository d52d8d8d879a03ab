//! Asset loading for the render and audio adapters. Nothing here is on the tick path: loaders
//! run ahead of the session and failures end in fallback content, never in an error the
//! simulation has to handle.

use std::{thread, time::Duration};

use ahash::AHashMap;
use log::{debug, warn};

use crate::{consts, error::CollaboratorError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RetryPolicy {
    pub const DEFAULT: Self = Self {
        max_attempts: consts::assets::MAX_RETRIES,
        delay: Duration::from_millis(consts::assets::RETRY_DELAY_MS),
    };

    /// Retries right away, for loaders that are known not to recover with time
    pub const IMMEDIATE: Self = Self {
        max_attempts: consts::assets::MAX_RETRIES,
        delay: Duration::ZERO,
    };
}

/// A loaded asset, or fallback content along with the last failure
#[derive(Clone, Debug, PartialEq)]
pub enum AssetLoad<T> {
    Loaded(T),
    Fallback { asset: T, error: CollaboratorError },
}

impl<T> AssetLoad<T> {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    #[must_use]
    pub const fn asset(&self) -> &T {
        match self {
            Self::Loaded(asset) | Self::Fallback { asset, .. } => asset,
        }
    }

    #[must_use]
    pub fn into_asset(self) -> T {
        match self {
            Self::Loaded(asset) | Self::Fallback { asset, .. } => asset,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&CollaboratorError> {
        match self {
            Self::Loaded(_) => None,
            Self::Fallback { error, .. } => Some(error),
        }
    }
}

/// Calls `load` until it succeeds or the policy runs out, then builds the fallback
pub fn load_with_retry<T>(
    key: &str,
    policy: RetryPolicy,
    mut load: impl FnMut(&str) -> Result<T, CollaboratorError>,
    fallback: impl FnOnce() -> T,
) -> AssetLoad<T> {
    let attempts = policy.max_attempts.max(1);

    let mut attempt = 1;
    loop {
        match load(key) {
            Ok(asset) => {
                debug!("Loaded asset \"{key}\" on attempt {attempt}");
                return AssetLoad::Loaded(asset);
            }
            Err(error) if attempt >= attempts => {
                warn!("Giving up on asset \"{key}\" after {attempts} attempts, using fallback: {error}");
                return AssetLoad::Fallback {
                    asset: fallback(),
                    error,
                };
            }
            Err(error) => {
                warn!("Attempt {attempt}/{attempts} to load asset \"{key}\" failed: {error}");
                if !policy.delay.is_zero() {
                    thread::sleep(policy.delay);
                }
                attempt += 1;
            }
        }
    }
}

/// Loaded assets keyed by path, with progress for a loading screen
#[derive(Clone, Debug)]
pub struct AssetCache<T> {
    policy: RetryPolicy,
    entries: AHashMap<String, T>,
    total: usize,
    loaded: usize,
    errors: Vec<String>,
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self::new(RetryPolicy::DEFAULT)
    }
}

impl<T> AssetCache<T> {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            entries: AHashMap::new(),
            total: 0,
            loaded: 0,
            errors: Vec::new(),
        }
    }

    /// Number of assets the loading screen expects
    pub const fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    /// One message per asset that ended in fallback
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Percentage of `total` loaded successfully, 0 if `total` is unset
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }

        #[allow(clippy::cast_precision_loss)]
        let ratio = self.loaded as f32 / self.total as f32;
        ratio * 100.0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the cached asset, loading it first if needed
    ///
    /// Fallback content is not cached, so a later call tries the real asset again.
    pub fn get_or_load(
        &mut self,
        key: &str,
        load: impl FnMut(&str) -> Result<T, CollaboratorError>,
        fallback: impl FnOnce() -> T,
    ) -> AssetLoad<T>
    where
        T: Clone,
    {
        if let Some(asset) = self.entries.get(key) {
            return AssetLoad::Loaded(asset.clone());
        }

        let result = load_with_retry(key, self.policy, load, fallback);
        match &result {
            AssetLoad::Loaded(asset) => {
                self.loaded += 1;
                self.entries.insert(key.to_owned(), asset.clone());
            }
            AssetLoad::Fallback { .. } => {
                self.errors.push(format!("Failed to load asset: {key}"));
            }
        }
        result
    }

    /// Forgets every asset and resets progress
    pub fn reset(&mut self) {
        self.entries.clear();
        self.total = 0;
        self.loaded = 0;
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flaky(failures: u32) -> impl FnMut(&str) -> Result<&'static str, CollaboratorError> {
        let mut calls = 0;
        move |key: &str| {
            calls += 1;
            if calls <= failures {
                Err(CollaboratorError::AssetUnavailable(key.to_owned()))
            } else {
                Ok("texture")
            }
        }
    }

    #[test]
    fn recovers_within_attempts() {
        let result = load_with_retry("road.png", RetryPolicy::IMMEDIATE, flaky(2), || "magenta");
        assert_eq!(result, AssetLoad::Loaded("texture"));
    }

    #[test]
    fn falls_back_after_last_attempt() {
        let result = load_with_retry("road.png", RetryPolicy::IMMEDIATE, flaky(3), || "magenta");
        assert!(result.is_fallback());
        assert_eq!(*result.asset(), "magenta");
        assert_eq!(
            result.error(),
            Some(&CollaboratorError::AssetUnavailable("road.png".to_owned()))
        );
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        };
        let result = load_with_retry("engine.mp3", policy, flaky(0), || "silence");
        assert_eq!(result.into_asset(), "texture");
    }

    #[test]
    fn cache_tracks_progress() {
        let mut cache = AssetCache::new(RetryPolicy::IMMEDIATE);
        assert_eq!(cache.progress(), 0.0);
        cache.set_total(4);

        cache.get_or_load("a", flaky(0), || "fallback");
        cache.get_or_load("b", flaky(5), || "fallback");
        assert_eq!(cache.loaded(), 1);
        assert_eq!(cache.progress(), 25.0);
        assert_eq!(cache.errors(), ["Failed to load asset: b"]);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));

        // Cached, so the loader is not called again
        let result = cache.get_or_load("a", |_| Err(CollaboratorError::Other("boom".into())), || "x");
        assert_eq!(result, AssetLoad::Loaded("texture"));
        assert_eq!(cache.loaded(), 1);

        cache.reset();
        assert_eq!(cache.progress(), 0.0);
        assert!(cache.errors().is_empty());
    }
}
