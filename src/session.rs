// Lookup orchestration.
// Owns the per-class caches and request slots, and decides which results
// are allowed to land in presentation state.

use std::sync::Mutex;

use tracing::debug;

use crate::cache::LruCache;
use crate::error::{HubseekError, Result};
use crate::github::{GitHubClient, RateLimit, Repository, UserProfile, UserSuggestion};
use crate::request::{RequestGuard, RequestSlot};

/// Source of user data, implemented by the GitHub client.
///
/// The seam exists so the superseding behavior can be exercised with a
/// scripted source in tests.
#[allow(async_fn_in_trait)]
pub trait UserSource {
    async fn search_users(
        &self,
        query: &str,
        per_page: u32,
        guard: &RequestGuard,
    ) -> Result<Vec<UserSuggestion>>;

    async fn fetch_user(&self, login: &str, guard: &RequestGuard) -> Result<UserProfile>;

    async fn fetch_repos(
        &self,
        login: &str,
        per_page: u32,
        guard: &RequestGuard,
    ) -> Result<Vec<Repository>>;
}

impl UserSource for GitHubClient {
    async fn search_users(
        &self,
        query: &str,
        per_page: u32,
        guard: &RequestGuard,
    ) -> Result<Vec<UserSuggestion>> {
        GitHubClient::search_users(self, query, per_page, guard).await
    }

    async fn fetch_user(&self, login: &str, guard: &RequestGuard) -> Result<UserProfile> {
        self.get_user(login, guard).await
    }

    async fn fetch_repos(
        &self,
        login: &str,
        per_page: u32,
        guard: &RequestGuard,
    ) -> Result<Vec<Repository>> {
        self.get_user_repos(login, per_page, guard).await
    }
}

/// Outcome of a lookup.
#[derive(Debug, Clone)]
pub enum Lookup<T> {
    /// Served from the cache.
    Hit(T),
    /// Fetched from the network and now cached.
    Fetched(T),
    /// A newer request of the same class took over; nothing to show.
    Superseded,
}

impl<T> Lookup<T> {
    /// The carried value, if this lookup produced one.
    pub fn value(self) -> Option<T> {
        match self {
            Lookup::Hit(value) | Lookup::Fetched(value) => Some(value),
            Lookup::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Lookup::Superseded)
    }
}

/// Cache capacities and fetch sizes for a search session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Max cached suggestion lists, keyed by normalized query.
    pub suggestion_capacity: usize,
    /// Max cached user profiles, keyed by login.
    pub user_capacity: usize,
    /// Max cached repository lists, keyed by login.
    pub repo_capacity: usize,
    /// Search hits requested per suggestion fetch.
    pub suggestions_per_fetch: u32,
    /// Repositories requested per repository fetch.
    pub repos_per_fetch: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            suggestion_capacity: 50,
            user_capacity: 25,
            repo_capacity: 25,
            suggestions_per_fetch: 8,
            repos_per_fetch: 10,
        }
    }
}

/// Cache and in-flight slot for one request class.
///
/// The mutexes guard single-threaded cooperative interleaving; they are
/// never held across an await.
struct RequestClass<T> {
    cache: Mutex<LruCache<String, T>>,
    slot: Mutex<RequestSlot>,
}

impl<T: Clone> RequestClass<T> {
    fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            slot: Mutex::new(RequestSlot::new()),
        }
    }

    fn cached(&self, key: &str) -> Option<T> {
        self.cache.lock().expect("cache lock poisoned").get(key).cloned()
    }

    fn begin(&self) -> RequestGuard {
        self.slot.lock().expect("slot lock poisoned").begin()
    }

    fn cancel(&self) {
        self.slot.lock().expect("slot lock poisoned").cancel();
    }

    fn clear(&self) {
        self.cache.lock().expect("cache lock poisoned").clear();
    }

    /// Settle a finished fetch and decide what the caller sees.
    ///
    /// A guard that is no longer current discards the outcome, success or
    /// failure alike; a current guard caches a success before returning it.
    fn finish(&self, guard: RequestGuard, key: String, result: Result<T>) -> Result<Lookup<T>> {
        let settled = self.slot.lock().expect("slot lock poisoned").settle(&guard);
        if !settled {
            debug!(%key, "discarding superseded result");
            return Ok(Lookup::Superseded);
        }
        match result {
            Ok(value) => {
                self.cache
                    .lock()
                    .expect("cache lock poisoned")
                    .insert(key, value.clone());
                Ok(Lookup::Fetched(value))
            }
            Err(HubseekError::Cancelled) => Ok(Lookup::Superseded),
            Err(e) => Err(e),
        }
    }
}

/// A user-search session: three independent cache/slot pairs over one source.
///
/// Lookups take `&self` so rapid successive calls can overlap; per class,
/// only the most recently begun request is allowed to complete meaningfully.
pub struct SearchSession<S = GitHubClient> {
    source: S,
    config: SessionConfig,
    suggestions: RequestClass<Vec<UserSuggestion>>,
    users: RequestClass<UserProfile>,
    repos: RequestClass<Vec<Repository>>,
}

impl SearchSession<GitHubClient> {
    /// Build a session over the real GitHub API, token from the environment.
    pub fn from_env(config: SessionConfig) -> Result<Self> {
        Ok(Self::new(GitHubClient::from_env()?, config))
    }

    /// Latest rate limit snapshot.
    pub fn rate_limit(&self) -> RateLimit {
        self.source.rate_limit()
    }
}

impl<S> SearchSession<S> {
    pub fn new(source: S, config: SessionConfig) -> Self {
        Self {
            source,
            config,
            suggestions: RequestClass::new(config.suggestion_capacity),
            users: RequestClass::new(config.user_capacity),
            repos: RequestClass::new(config.repo_capacity),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop cached suggestion lists.
    pub fn clear_suggestions(&self) {
        self.suggestions.clear();
    }

    /// Drop cached user profiles.
    pub fn clear_users(&self) {
        self.users.clear();
    }

    /// Drop cached repository lists.
    pub fn clear_repos(&self) {
        self.repos.clear();
    }

    /// Drop everything cached, all classes.
    pub fn clear_all(&self) {
        self.suggestions.clear();
        self.users.clear();
        self.repos.clear();
    }

    /// Cancel any in-flight lookups (session teardown).
    pub fn cancel_pending(&self) {
        self.suggestions.cancel();
        self.users.cancel();
        self.repos.cancel();
    }
}

impl<S: UserSource> SearchSession<S> {
    /// Autocomplete suggestions for `raw_query`.
    pub async fn suggestions(&self, raw_query: &str) -> Result<Lookup<Vec<UserSuggestion>>> {
        let Some(query) = normalize(raw_query) else {
            // An empty query has a fixed empty result; never hits the network
            return Ok(Lookup::Hit(Vec::new()));
        };
        if let Some(hit) = self.suggestions.cached(&query) {
            return Ok(Lookup::Hit(hit));
        }

        let guard = self.suggestions.begin();
        let result = self
            .source
            .search_users(&query, self.config.suggestions_per_fetch, &guard)
            .await;
        self.suggestions.finish(guard, query, result)
    }

    /// Profile for `raw_login`.
    pub async fn user(&self, raw_login: &str) -> Result<Lookup<UserProfile>> {
        let Some(login) = normalize(raw_login) else {
            return Err(HubseekError::NotFound(raw_login.trim().to_string()));
        };
        if let Some(hit) = self.users.cached(&login) {
            return Ok(Lookup::Hit(hit));
        }

        let guard = self.users.begin();
        let result = self.source.fetch_user(&login, &guard).await;
        self.users.finish(guard, login, result)
    }

    /// Most recently updated public repositories for `raw_login`.
    pub async fn repos(&self, raw_login: &str) -> Result<Lookup<Vec<Repository>>> {
        let Some(login) = normalize(raw_login) else {
            return Err(HubseekError::NotFound(raw_login.trim().to_string()));
        };
        if let Some(hit) = self.repos.cached(&login) {
            return Ok(Lookup::Hit(hit));
        }

        let guard = self.repos.begin();
        let result = self
            .source
            .fetch_repos(&login, self.config.repos_per_fetch, &guard)
            .await;
        self.repos.finish(guard, login, result)
    }
}

impl<S> Drop for SearchSession<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Normalized cache key: trimmed and ASCII-lowercased (GitHub logins and
/// search queries are case-insensitive). None when empty.
fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}
