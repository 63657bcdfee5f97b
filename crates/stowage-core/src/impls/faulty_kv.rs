//! FaultyKvStore - 障害注入用の KV ストア
//!
//! 任意のストアをラップし、設定した条件に一致する操作を失敗させます。
//! save 途中の書き込み失敗とロールバックの検証に使います。
//!
//! # 学習ポイント
//! - ジェネリックなラッパー（Decorator パターン）
//! - 残り発火回数による一時的な障害の表現

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::ports::{KeyValueStore, StoreError, StoreOp};

/// One injected failure rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub op: StoreOp,
    /// Only keys ending with this suffix are affected. `None` matches every key.
    pub key_suffix: Option<String>,
    /// Number of times the fault fires before it disarms. `None` never disarms.
    pub max_triggers: Option<usize>,
}

impl Fault {
    pub fn new(op: StoreOp) -> Self {
        Self {
            op,
            key_suffix: None,
            max_triggers: None,
        }
    }

    pub fn on_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.key_suffix = Some(suffix.into());
        self
    }

    pub fn max_triggers(mut self, n: usize) -> Self {
        self.max_triggers = Some(n);
        self
    }

    fn matches(&self, op: StoreOp, key: &str) -> bool {
        self.op == op
            && self.max_triggers != Some(0)
            && self
                .key_suffix
                .as_deref()
                .is_none_or(|suffix| key.ends_with(suffix))
    }
}

/// FaultyKvStore はラップしたストアへの操作を条件付きで失敗させる
#[derive(Debug)]
pub struct FaultyKvStore<S> {
    inner: S,
    faults: Mutex<Vec<Fault>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    deletes: AtomicUsize,
}

impl<S: KeyValueStore> FaultyKvStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Mutex::new(Vec::new()),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn with_fault(self, fault: Fault) -> Self {
        self.inject(fault);
        self
    }

    pub fn inject(&self, fault: Fault) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(fault);
    }

    pub fn clear_faults(&self) {
        self.faults
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of calls of `op` that reached this wrapper, failed or not.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.counter(op).load(Ordering::SeqCst)
    }

    fn counter(&self, op: StoreOp) -> &AtomicUsize {
        match op {
            StoreOp::Get => &self.gets,
            StoreOp::Set => &self.sets,
            StoreOp::Delete => &self.deletes,
        }
    }

    fn check(&self, op: StoreOp, key: &str) -> Result<(), StoreError> {
        self.counter(op).fetch_add(1, Ordering::SeqCst);

        let mut faults = self.faults.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(fault) = faults.iter_mut().find(|f| f.matches(op, key)) else {
            return Ok(());
        };
        if let Some(remaining) = fault.max_triggers.as_mut() {
            *remaining -= 1;
        }
        Err(StoreError::InjectedFault {
            op,
            key: key.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl<S: KeyValueStore> KeyValueStore for FaultyKvStore<S> {
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check(StoreOp::Set, key)?;
        self.inner.set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check(StoreOp::Get, key)?;
        self.inner.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check(StoreOp::Delete, key)?;
        self.inner.delete(key).await
    }
}
