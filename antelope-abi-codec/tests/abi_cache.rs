//! AST cache: snapshot publication, refresh and failure isolation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use antelope_abi_codec::cache::{AbiCache, AbiProvider};
use antelope_abi_core::abi::RawAbi;
use antelope_abi_core::error::{ChainError, CodecError, TransactionError};
use async_trait::async_trait;
use tokio::sync::Notify;

const V1: &str = r#"{"structs": [{"name": "hi", "base": "", "fields": [{"name": "user", "type": "name"}]}],
    "actions": [{"name": "hi", "type": "hi", "ricardian_contract": ""}]}"#;
const V2: &str = r#"{"structs": [{"name": "hi", "base": "", "fields": [{"name": "user", "type": "name"}, {"name": "n", "type": "uint8"}]}],
    "actions": [{"name": "hi", "type": "hi", "ricardian_contract": ""}]}"#;
const BROKEN: &str = r#"{"structs": [{"name": "hi", "base": "ghost", "fields": []}]}"#;

struct FakeProvider {
    abi: Mutex<String>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn serving(json: &str) -> Self {
        Self {
            abi: Mutex::new(json.to_string()),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    fn serve(&self, json: &str) {
        *self.abi.lock().unwrap() = json.to_string();
    }
}

#[async_trait]
impl AbiProvider for FakeProvider {
    async fn get_abi(&self, account: &str) -> Result<RawAbi, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ChainError::Unreachable {
                message: format!("get_abi {}", account),
            });
        }
        let json = self.abi.lock().unwrap().clone();
        RawAbi::from_json(&json).map_err(|e| ChainError::InvalidResponse {
            message: e.to_string(),
        })
    }
}

/// Serves `versions[n]` on the n-th call. The call numbered `gated` signals
/// `entered` and then waits for `release`.
struct GatedProvider {
    versions: Vec<&'static str>,
    gated: usize,
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

impl GatedProvider {
    fn new(versions: Vec<&'static str>, gated: usize) -> Self {
        Self {
            versions,
            gated,
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl AbiProvider for GatedProvider {
    async fn get_abi(&self, _account: &str) -> Result<RawAbi, ChainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let json = self.versions[call.min(self.versions.len() - 1)];
        if call == self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        RawAbi::from_json(json).map_err(|e| ChainError::InvalidResponse {
            message: e.to_string(),
        })
    }
}

#[tokio::test]
async fn test_miss_then_hit() {
    let cache = AbiCache::new(FakeProvider::serving(V1));
    assert!(cache.cached("hello").is_none());

    let first = cache.get("hello").await.unwrap();
    let second = cache.get("hello").await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.contract(), "hello");
    assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_swaps_snapshot_and_keeps_old_readers() {
    let cache = AbiCache::new(FakeProvider::serving(V1));
    let old = cache.get("hello").await.unwrap();

    cache.provider().serve(V2);
    let new = cache.refresh("hello").await.unwrap();

    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(old.get_struct("hi").unwrap().fields.len(), 1);
    assert_eq!(new.get_struct("hi").unwrap().fields.len(), 2);
    assert!(Arc::ptr_eq(&cache.cached("hello").unwrap(), &new));
}

#[tokio::test]
async fn test_failed_fetch_leaves_cache_untouched() {
    let cache = AbiCache::new(FakeProvider::serving(V1));
    let old = cache.get("hello").await.unwrap();

    cache.provider().fail.store(true, Ordering::SeqCst);
    let err = cache.refresh("hello").await.unwrap_err();
    assert!(err.is_network());
    assert!(Arc::ptr_eq(&cache.cached("hello").unwrap(), &old));

    let err = cache.get("other").await.unwrap_err();
    assert!(matches!(err, TransactionError::Chain(ChainError::Unreachable { .. })));
    assert!(cache.cached("other").is_none());
}

#[tokio::test]
async fn test_malformed_abi_is_not_published() {
    let cache = AbiCache::new(FakeProvider::serving(V1));
    let old = cache.get("hello").await.unwrap();

    cache.provider().serve(BROKEN);
    let err = cache.refresh("hello").await.unwrap_err();
    assert!(matches!(err, TransactionError::Codec(CodecError::MalformedAbi { .. })));
    assert!(!err.is_network());
    assert!(Arc::ptr_eq(&cache.cached("hello").unwrap(), &old));
}

#[tokio::test]
async fn test_invalidate_and_ast_for() {
    let cache = AbiCache::new(FakeProvider::serving(V1));
    cache.get("hello").await.unwrap();
    assert!(cache.invalidate("hello"));
    assert!(!cache.invalidate("hello"));
    assert!(cache.cached("hello").is_none());

    let ast = cache.ast_for(["hello", "world"]).await.unwrap();
    let mut names: Vec<&str> = ast.contracts().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["hello", "world"]);
    assert_eq!(ast.contract("world").unwrap().action_type("hi"), Some("hi"));
    assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_dropped_refresh_leaves_cache_untouched() {
    let cache = AbiCache::new(GatedProvider::new(vec![V1, V2], 1));
    let old = cache.get("hello").await.unwrap();

    // The refresh future is dropped while its fetch is parked.
    tokio::select! {
        _ = cache.refresh("hello") => panic!("gated fetch should not finish"),
        _ = cache.provider().entered.notified() => {}
    }
    assert!(Arc::ptr_eq(&cache.cached("hello").unwrap(), &old));
    assert_eq!(old.get_struct("hi").unwrap().fields.len(), 1);

    let new = cache.refresh("hello").await.unwrap();
    assert_eq!(new.get_struct("hi").unwrap().fields.len(), 2);
}

#[tokio::test]
async fn test_slow_refresh_does_not_overwrite_newer_snapshot() {
    // Call 0 serves V1 but is held until call 1 (V2) has published.
    let cache = AbiCache::new(GatedProvider::new(vec![V1, V2], 0));
    let provider = cache.provider();

    let slow = cache.refresh("hello");
    let fast = async {
        provider.entered.notified().await;
        let fresh = cache.refresh("hello").await;
        provider.release.notify_one();
        fresh
    };
    let (slow, fast) = tokio::join!(slow, fast);
    let (slow, fast) = (slow.unwrap(), fast.unwrap());

    assert_eq!(fast.get_struct("hi").unwrap().fields.len(), 2);
    assert!(Arc::ptr_eq(&slow, &fast));
    assert!(Arc::ptr_eq(&cache.cached("hello").unwrap(), &fast));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}
