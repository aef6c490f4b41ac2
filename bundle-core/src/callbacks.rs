//! Callback objects for the bundle cache and quick fix flows

use crate::codes::{ErrCode, ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT};
use crate::status_receiver::Completion;
use crate::types::QuickFixResult;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum time, in seconds, a cache stat or clean result is waited for
pub const MAX_WAITING_TIME: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheOutcome {
    Stat(u64),
    Clean(i32),
}

/// Receives the outcome of a whole-device cache stat or cache clean.
///
/// Both outcomes share one latch: once either has been delivered, the
/// callback is spent. Waiting for the other outcome then returns `false`
/// immediately.
#[derive(Debug)]
pub struct ProcessCacheCallback {
    outcome: Completion<CacheOutcome>,
    wait: Duration,
}

impl ProcessCacheCallback {
    pub fn new() -> Self {
        Self::with_wait_time(Duration::from_secs(MAX_WAITING_TIME))
    }

    pub fn with_wait_time(wait: Duration) -> Self {
        Self {
            outcome: Completion::new(),
            wait,
        }
    }

    pub fn on_get_all_bundle_cache_finished(&self, cache_stat: u64) {
        info!("get all bundle cache finished, size {}", cache_stat);
        if !self.outcome.complete(CacheOutcome::Stat(cache_stat)) {
            warn!("cache callback already completed");
        }
    }

    pub fn on_clean_all_bundle_cache_finished(&self, result: i32) {
        info!("clean all bundle cache finished, result {}", result);
        if !self.outcome.complete(CacheOutcome::Clean(result)) {
            warn!("cache callback already completed");
        }
    }

    /// Wait for a cache stat. Returns `true` when one arrived in time.
    ///
    /// Returns `false` as soon as a clean result is delivered instead, or
    /// once the wait bound elapses with nothing delivered.
    pub async fn wait_for_stat_completion(&self) -> bool {
        matches!(self.outcome.wait(self.wait).await, Some(CacheOutcome::Stat(_)))
    }

    /// Wait for a cache clean result. Returns `true` when one arrived in time.
    ///
    /// Returns `false` as soon as a cache stat is delivered instead, or
    /// once the wait bound elapses with nothing delivered.
    pub async fn wait_for_clean_completion(&self) -> bool {
        matches!(self.outcome.wait(self.wait).await, Some(CacheOutcome::Clean(_)))
    }

    /// Delivered cache size in bytes, `0` if none.
    pub fn cache_stat(&self) -> u64 {
        match self.outcome.get() {
            Some(CacheOutcome::Stat(size)) => size,
            _ => 0,
        }
    }

    /// Delivered clean result, `0` if none.
    pub fn clean_result(&self) -> i32 {
        match self.outcome.get() {
            Some(CacheOutcome::Clean(result)) => result,
            _ => 0,
        }
    }
}

impl Default for ProcessCacheCallback {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives the outcome of a quick fix deploy, switch or delete.
#[derive(Debug)]
pub struct QuickFixStatusCallback {
    result: Completion<(ErrCode, Option<QuickFixResult>)>,
    wait: Duration,
}

impl QuickFixStatusCallback {
    pub fn new() -> Self {
        Self::with_wait_time(Duration::from_secs(crate::status_receiver::MINIMUM_WAITING_TIME))
    }

    pub fn with_wait_time(wait: Duration) -> Self {
        debug!("create quick fix status callback");
        Self {
            result: Completion::new(),
            wait,
        }
    }

    pub fn on_patch_deployed(&self, result: QuickFixResult) {
        self.deliver(result.result_code(), Some(result));
    }

    pub fn on_patch_switched(&self, result: QuickFixResult) {
        self.deliver(result.result_code(), Some(result));
    }

    pub fn on_patch_deleted(&self, result: QuickFixResult) {
        self.deliver(result.result_code(), Some(result));
    }

    /// The operation failed before the service produced a result.
    pub fn on_failed(&self, code: ErrCode) {
        self.deliver(code, None);
    }

    fn deliver(&self, code: ErrCode, result: Option<QuickFixResult>) {
        info!("quick fix finished with code {}", code);
        if !self.result.complete((code, result)) {
            warn!("quick fix callback already completed");
        }
    }

    /// Wait for the result code and result, or the quick fix timeout code.
    pub async fn result_code(&self) -> (ErrCode, Option<QuickFixResult>) {
        self.result
            .wait(self.wait)
            .await
            .unwrap_or((ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT, None))
    }
}

impl Default for QuickFixStatusCallback {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SwitchQuickFixResult;

    fn short() -> Duration {
        Duration::from_millis(20)
    }

    #[tokio::test]
    async fn test_stat_completion() {
        let callback = ProcessCacheCallback::with_wait_time(short());
        callback.on_get_all_bundle_cache_finished(4096);

        assert!(callback.wait_for_stat_completion().await);
        assert_eq!(callback.cache_stat(), 4096);
        assert_eq!(callback.clean_result(), 0);
    }

    #[tokio::test]
    async fn test_clean_latch_is_shared_with_stat() {
        let callback = ProcessCacheCallback::with_wait_time(short());
        callback.on_clean_all_bundle_cache_finished(0);
        callback.on_get_all_bundle_cache_finished(10);

        assert!(callback.wait_for_clean_completion().await);
        assert!(!callback.wait_for_stat_completion().await);
        assert_eq!(callback.cache_stat(), 0);
    }

    #[tokio::test]
    async fn test_other_outcome_ends_wait_early() {
        let callback = ProcessCacheCallback::with_wait_time(Duration::from_secs(MAX_WAITING_TIME));
        callback.on_clean_all_bundle_cache_finished(5);

        let stat = callback.wait_for_stat_completion();
        let waited = tokio::time::timeout(Duration::from_secs(1), stat).await.unwrap();
        assert!(!waited);
        assert_eq!(callback.clean_result(), 5);
    }

    #[tokio::test]
    async fn test_cache_wait_times_out() {
        let callback = ProcessCacheCallback::with_wait_time(short());
        assert!(!callback.wait_for_clean_completion().await);
    }

    #[tokio::test]
    async fn test_quick_fix_result_and_timeout() {
        let callback = QuickFixStatusCallback::with_wait_time(short());
        callback.on_patch_switched(QuickFixResult::Switch(SwitchQuickFixResult {
            result_code: 0,
            bundle_name: "com.example.app".to_string(),
            enable: true,
        }));
        let (code, result) = callback.result_code().await;
        assert_eq!(code, 0);
        assert!(result.is_some());

        let idle = QuickFixStatusCallback::with_wait_time(short());
        let (code, result) = idle.result_code().await;
        assert_eq!(code, ERR_BUNDLEMANAGER_QUICK_FIX_OPERATION_TIME_OUT);
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_quick_fix_failure_without_result() {
        let callback = QuickFixStatusCallback::with_wait_time(short());
        callback.on_failed(crate::codes::ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED);
        let (code, result) = callback.result_code().await;
        assert_eq!(code, crate::codes::ERR_BUNDLEMANAGER_QUICK_FIX_FAILED_SERVICE_DIED);
        assert!(result.is_none());
    }
}
