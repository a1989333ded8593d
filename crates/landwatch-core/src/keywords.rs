//! Per-identity watch keywords mirrored from the keyword store

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use async_trait::async_trait;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Shown instead of the manager when nobody is signed in
pub const SIGN_IN_PROMPT: &str = "로그인 후 키워드를 관리할 수 있습니다.";

/// Rows keyed by (identity, keyword)
#[async_trait]
pub trait KeywordStore: Send + Sync {
    /// All keywords for `user_id`, in store order
    async fn list(&self, user_id: &str) -> CoreResult<Vec<String>>;

    async fn insert(&self, user_id: &str, keyword: &str) -> CoreResult<()>;

    /// Delete rows matching both `user_id` and `keyword` exactly
    async fn delete(&self, user_id: &str, keyword: &str) -> CoreResult<()>;
}

/// Shared store reference
pub type StoreRef = Arc<dyn KeywordStore>;

/// Process-local store, used when no remote table is configured
#[derive(Debug, Default)]
pub struct MemoryKeywordStore {
    rows: RwLock<Vec<(String, String)>>,
}

impl MemoryKeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<(String, String)>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl KeywordStore for MemoryKeywordStore {
    async fn list(&self, user_id: &str) -> CoreResult<Vec<String>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|(user, _)| user == user_id)
            .map(|(_, keyword)| keyword.clone())
            .collect())
    }

    async fn insert(&self, user_id: &str, keyword: &str) -> CoreResult<()> {
        self.rows
            .write()
            .await
            .push((user_id.to_string(), keyword.to_string()));
        Ok(())
    }

    async fn delete(&self, user_id: &str, keyword: &str) -> CoreResult<()> {
        self.rows
            .write()
            .await
            .retain(|(user, kw)| !(user == user_id && kw == keyword));
        Ok(())
    }
}

/// Holds the busy flag until dropped
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> CoreResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::Busy)?;
        Ok(Self { flag: flag.clone() })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Local mirror of one identity's keyword rows
pub struct KeywordManager {
    store: StoreRef,
    identity: Option<String>,
    keywords: Vec<String>,
    input: String,
    busy: Arc<AtomicBool>,
    loaded: bool,
    last_error: Option<String>,
}

impl std::fmt::Debug for KeywordManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordManager")
            .field("identity", &self.identity)
            .field("keywords", &self.keywords)
            .field("input", &self.input)
            .field("busy", &self.is_busy())
            .field("loaded", &self.loaded)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl KeywordManager {
    /// A manager with no identity; every operation is a no-op until one is set
    pub fn new(store: StoreRef) -> Self {
        Self {
            store,
            identity: None,
            keywords: Vec::new(),
            input: String::new(),
            busy: Arc::new(AtomicBool::new(false)),
            loaded: false,
            last_error: None,
        }
    }

    pub fn with_identity(store: StoreRef, identity: &str) -> Self {
        let mut manager = Self::new(store);
        manager.identity = normalize_identity(identity);
        manager
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Shared handle on the busy flag, readable without locking the manager
    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        self.busy.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Last failure shown to the user, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_input(&mut self, value: &str) {
        self.input = value.to_string();
    }

    pub fn can_submit(&self) -> bool {
        self.is_authenticated() && !self.is_busy() && !self.input.trim().is_empty()
    }

    /// Switch identity; a new identity drops the mirror and reloads
    pub async fn set_identity(&mut self, identity: Option<&str>) -> CoreResult<()> {
        let identity = identity.and_then(normalize_identity);
        if identity == self.identity && self.loaded {
            return Ok(());
        }
        self.identity = identity;
        self.keywords.clear();
        self.input.clear();
        self.loaded = false;
        self.last_error = None;
        if self.identity.is_some() {
            self.load().await?;
        }
        Ok(())
    }

    /// Replace the mirror with the store's rows for this identity
    pub async fn load(&mut self) -> CoreResult<()> {
        let identity = self.identity.clone().ok_or(CoreError::Unauthenticated)?;
        let _busy = BusyGuard::acquire(&self.busy)?;

        match self.store.list(&identity).await {
            Ok(keywords) => {
                log::debug!("Loaded {} keywords for {}", keywords.len(), identity);
                self.keywords = keywords;
                self.loaded = true;
                self.last_error = None;
                Ok(())
            }
            Err(error) => Err(self.record_failure(error, "load_keywords", &identity)),
        }
    }

    /// Load once per manager; failures are kept in `last_error`
    pub async fn ensure_loaded(&mut self) {
        if self.loaded || self.identity.is_none() {
            return;
        }
        if let Err(error) = self.load().await {
            log::debug!("Keyword load deferred: {}", error);
        }
    }

    /// Insert the current input
    ///
    /// Returns `Ok(false)` when there is nothing to do. On success the
    /// keyword is appended and the input cleared; on failure both the
    /// mirror and the input are left as they were.
    pub async fn add(&mut self) -> CoreResult<bool> {
        let keyword = self.input.trim().to_string();
        let identity = match &self.identity {
            Some(identity) if !keyword.is_empty() => identity.clone(),
            _ => return Ok(false),
        };
        let _busy = BusyGuard::acquire(&self.busy)?;

        match self.store.insert(&identity, &keyword).await {
            Ok(()) => {
                log::info!("Added keyword '{}' for {}", keyword, identity);
                self.keywords.push(keyword);
                self.input.clear();
                self.last_error = None;
                Ok(true)
            }
            Err(error) => Err(self.record_failure(error, "add_keyword", &identity)),
        }
    }

    /// Set the input to `keyword` and add it
    pub async fn add_keyword(&mut self, keyword: &str) -> CoreResult<bool> {
        self.set_input(keyword);
        self.add().await
    }

    /// Delete `keyword`; on success the first matching mirror entry goes
    pub async fn remove(&mut self, keyword: &str) -> CoreResult<bool> {
        let identity = match &self.identity {
            Some(identity) => identity.clone(),
            None => return Ok(false),
        };
        let _busy = BusyGuard::acquire(&self.busy)?;

        match self.store.delete(&identity, keyword).await {
            Ok(()) => {
                log::info!("Removed keyword '{}' for {}", keyword, identity);
                if let Some(pos) = self.keywords.iter().position(|k| k == keyword) {
                    self.keywords.remove(pos);
                }
                self.last_error = None;
                Ok(true)
            }
            Err(error) => Err(self.record_failure(error, "remove_keyword", &identity)),
        }
    }

    fn record_failure(&mut self, error: CoreError, operation: &str, identity: &str) -> CoreError {
        DefaultErrorLogger.log_error(&error, &ErrorContext::new(operation).with_user_id(identity));
        self.last_error = Some(error.user_message());
        error
    }
}

fn normalize_identity(identity: &str) -> Option<String> {
    let identity = identity.trim();
    if identity.is_empty() {
        None
    } else {
        Some(identity.to_string())
    }
}

type LockMap = HashMap<String, Arc<Mutex<()>>>;

fn lock_map(locks: &StdMutex<LockMap>) -> MutexGuard<'_, LockMap> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drop the identity's lock entry once nobody holds or waits on it
fn prune(locks: &StdMutex<LockMap>, identity: &str) {
    let mut map = lock_map(locks);
    if map.get(identity).is_some_and(|lock| Arc::strong_count(lock) == 1) {
        map.remove(identity);
    }
}

/// A freshly loaded manager plus exclusive use of its identity
///
/// Dereferences to the `KeywordManager`. Dropping it releases the identity.
pub struct KeywordSession {
    manager: KeywordManager,
    identity: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<StdMutex<LockMap>>,
}

impl std::fmt::Debug for KeywordSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("KeywordSession").field(&self.manager).finish()
    }
}

impl Deref for KeywordSession {
    type Target = KeywordManager;

    fn deref(&self) -> &KeywordManager {
        &self.manager
    }
}

impl DerefMut for KeywordSession {
    fn deref_mut(&mut self) -> &mut KeywordManager {
        &mut self.manager
    }
}

impl Drop for KeywordSession {
    fn drop(&mut self) {
        self.guard.take();
        prune(&self.locks, &self.identity);
    }
}

/// Per-identity request serialization
///
/// Keeps no keywords between requests; every `acquire` reads the store.
/// Only identities with a request in flight have an entry.
pub struct KeywordSessions {
    store: StoreRef,
    locks: Arc<StdMutex<LockMap>>,
}

impl KeywordSessions {
    pub fn new(store: StoreRef) -> Self {
        Self {
            store,
            locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Exclusive access to the identity's keywords, loaded from the store
    ///
    /// A request that arrives while another one holds the identity gets
    /// `CoreError::Busy` instead of waiting. A failed load is kept in the
    /// manager's `last_error`.
    pub async fn acquire(&self, identity: &str) -> CoreResult<KeywordSession> {
        let identity = normalize_identity(identity).ok_or(CoreError::Unauthenticated)?;
        let lock = lock_map(&self.locks).entry(identity.clone()).or_default().clone();

        let guard = match lock.try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                prune(&self.locks, &identity);
                return Err(CoreError::Busy);
            }
        };

        let mut session = KeywordSession {
            manager: KeywordManager::with_identity(self.store.clone(), &identity),
            identity,
            guard: Some(guard),
            locks: self.locks.clone(),
        };
        session.manager.ensure_loaded().await;
        Ok(session)
    }

    /// Identities with a request in flight
    pub fn len(&self) -> usize {
        lock_map(&self.locks).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_map(&self.locks).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::atomic::AtomicUsize;

    /// Fails every call and counts how many were made
    #[derive(Default)]
    struct FailingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl KeywordStore for FailingStore {
        async fn list(&self, _user_id: &str) -> CoreResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::StoreError {
                message: "connection refused".to_string(),
            })
        }

        async fn insert(&self, _user_id: &str, _keyword: &str) -> CoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::StoreError {
                message: "connection refused".to_string(),
            })
        }

        async fn delete(&self, _user_id: &str, _keyword: &str) -> CoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::StoreError {
                message: "connection refused".to_string(),
            })
        }
    }

    fn store_with(rows: &[(&str, &str)]) -> StoreRef {
        Arc::new(MemoryKeywordStore::with_rows(
            rows.iter().map(|(u, k)| (u.to_string(), k.to_string())).collect(),
        ))
    }

    #[tokio::test]
    async fn test_load_scoped_to_identity() {
        let store = store_with(&[("u1", "서초"), ("u2", "잠실"), ("u1", "반포")]);
        let mut manager = KeywordManager::with_identity(store, "u1");
        manager.load().await.unwrap();
        assert_eq!(manager.keywords(), ["서초", "반포"]);
        assert!(manager.is_loaded());
    }

    #[tokio::test]
    async fn test_add_appends_and_clears_input() {
        let store = store_with(&[("u1", "서초")]);
        let mut manager = KeywordManager::with_identity(store.clone(), "u1");
        manager.load().await.unwrap();

        manager.set_input("강남");
        assert!(manager.add().await.unwrap());
        assert_eq!(manager.keywords(), ["서초", "강남"]);
        assert_eq!(manager.input(), "");
        assert!(!manager.is_busy());
        assert_eq!(store.list("u1").await.unwrap(), vec!["서초", "강남"]);
    }

    #[tokio::test]
    async fn test_add_trims_and_skips_blank() {
        let store = store_with(&[]);
        let mut manager = KeywordManager::with_identity(store.clone(), "u1");
        assert!(!manager.add_keyword("   ").await.unwrap());
        assert!(manager.add_keyword("  분당 ").await.unwrap());
        assert_eq!(manager.keywords(), ["분당"]);
        assert_eq!(store.list("u1").await.unwrap(), vec!["분당"]);
    }

    #[tokio::test]
    async fn test_duplicates_allowed() {
        let mut manager = KeywordManager::with_identity(store_with(&[]), "u1");
        manager.add_keyword("강남").await.unwrap();
        manager.add_keyword("강남").await.unwrap();
        assert_eq!(manager.keywords(), ["강남", "강남"]);
    }

    #[tokio::test]
    async fn test_no_identity_is_noop() {
        let store = Arc::new(FailingStore::default());
        let mut manager = KeywordManager::new(store.clone());
        assert!(!manager.add_keyword("강남").await.unwrap());
        assert!(!manager.remove("강남").await.unwrap());
        assert!(matches!(manager.load().await, Err(CoreError::Unauthenticated)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert!(!manager.can_submit());
    }

    #[tokio::test]
    async fn test_failed_add_keeps_input_and_mirror() {
        let store = Arc::new(FailingStore::default());
        let mut manager = KeywordManager::with_identity(store, "u1");

        let err = manager.add_keyword("강남").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StoreError);
        assert!(manager.keywords().is_empty());
        assert_eq!(manager.input(), "강남");
        assert!(manager.last_error().is_some());
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn test_remove_first_match_only() {
        let store = store_with(&[("u1", "강남"), ("u1", "서초"), ("u1", "강남")]);
        let mut manager = KeywordManager::with_identity(store, "u1");
        manager.load().await.unwrap();

        assert!(manager.remove("강남").await.unwrap());
        assert_eq!(manager.keywords(), ["서초", "강남"]);
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_mirror() {
        let mut manager = KeywordManager::with_identity(Arc::new(FailingStore::default()), "u1");
        manager.keywords = vec!["강남".to_string()];
        assert!(manager.remove("강남").await.is_err());
        assert_eq!(manager.keywords(), ["강남"]);
    }

    #[tokio::test]
    async fn test_busy_flag_rejects_overlap() {
        let mut manager = KeywordManager::with_identity(store_with(&[]), "u1");
        let flag = manager.busy_flag();
        flag.store(true, Ordering::Release);

        assert!(matches!(manager.add_keyword("강남").await, Err(CoreError::Busy)));
        assert!(manager.keywords().is_empty());

        flag.store(false, Ordering::Release);
        assert!(manager.add().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_identity_reloads() {
        let store = store_with(&[("u1", "서초"), ("u2", "잠실")]);
        let mut manager = KeywordManager::new(store);
        manager.set_identity(Some("u1")).await.unwrap();
        assert_eq!(manager.keywords(), ["서초"]);

        manager.set_identity(Some("u2")).await.unwrap();
        assert_eq!(manager.keywords(), ["잠실"]);

        manager.set_identity(None).await.unwrap();
        assert!(manager.keywords().is_empty());
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_sessions_reload_from_store() {
        let store = store_with(&[("a@x.com", "서초")]);
        let sessions = KeywordSessions::new(store.clone());
        {
            let mut manager = sessions.acquire("a@x.com").await.unwrap();
            assert_eq!(manager.keywords(), ["서초"]);
            manager.set_input("반포");
        }

        store.insert("a@x.com", "강남").await.unwrap();
        let manager = sessions.acquire("a@x.com").await.unwrap();
        assert_eq!(manager.keywords(), ["서초", "강남"]);
        assert_eq!(manager.input(), "");
        assert!(manager.last_error().is_none());
    }

    #[tokio::test]
    async fn test_sessions_release_entries() {
        let sessions = KeywordSessions::new(store_with(&[]));
        let a = sessions.acquire("a@x.com").await.unwrap();
        let b = sessions.acquire("b@x.com").await.unwrap();
        assert_eq!(sessions.len(), 2);

        assert!(sessions.acquire("a@x.com").await.is_err());
        assert_eq!(sessions.len(), 2);

        drop(a);
        assert_eq!(sessions.len(), 1);
        drop(b);
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_concurrent_request_is_busy() {
        let sessions = KeywordSessions::new(store_with(&[]));
        let held = sessions.acquire("a@x.com").await.unwrap();
        assert!(matches!(sessions.acquire("a@x.com").await, Err(CoreError::Busy)));
        assert!(sessions.acquire("b@x.com").await.is_ok());
        drop(held);
        assert!(sessions.acquire("a@x.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_sessions_reject_blank_identity() {
        let sessions = KeywordSessions::new(store_with(&[]));
        assert!(matches!(sessions.acquire("  ").await, Err(CoreError::Unauthenticated)));
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_keep_load_error() {
        let sessions = KeywordSessions::new(Arc::new(FailingStore::default()));
        let manager = sessions.acquire("a@x.com").await.unwrap();
        assert!(!manager.is_loaded());
        assert!(manager.last_error().is_some());
    }
}
