//! Bridge from asynchronous service callbacks to a bounded wait
//!
//! The bundle manager reports installer results through a callback object
//! instead of a return value. [`StatusReceiver`] is that callback object:
//! the service side calls [`StatusReceiver::on_finished`] once, and the
//! requesting side awaits [`StatusReceiver::result_code`], which gives up
//! after the configured wait and reports [`ERR_OPERATION_TIME_OUT`].

use crate::codes::{ErrCode, ERR_OPERATION_TIME_OUT};
use crate::types::StatusResult;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Minimum time, in seconds, an installer result is waited for
pub const MINIMUM_WAITING_TIME: u64 = 180;

/// Single-fire value slot with a bounded wait.
///
/// The first call to [`Completion::complete`] stores the value and wakes every
/// waiter. Later calls leave the stored value untouched and return `false`.
/// The check and the store happen under the channel's lock, so two producers
/// racing each other cannot both win.
#[derive(Debug)]
pub struct Completion<T> {
    slot: watch::Sender<Option<T>>,
}

impl<T: Clone> Completion<T> {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Store `value` unless a value is already present.
    pub fn complete(&self, value: T) -> bool {
        let mut value = Some(value);
        self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = value.take();
            true
        })
    }

    pub fn is_complete(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Current value, without waiting.
    pub fn get(&self) -> Option<T> {
        self.slot.borrow().clone()
    }

    /// Wait up to `limit` for the value. Returns `None` on timeout.
    pub async fn wait(&self, limit: Duration) -> Option<T> {
        let mut rx = self.slot.subscribe();
        let waited = tokio::time::timeout(limit, rx.wait_for(Option::is_some)).await;
        let value = match waited {
            Ok(Ok(value)) => (*value).clone(),
            _ => None,
        };
        value
    }
}

impl<T: Clone> Default for Completion<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver for the final status of an installer operation.
///
/// Share it as `Arc<StatusReceiver>` between the caller and whatever delivers
/// the result. Only the first [`on_finished`](Self::on_finished) counts.
///
/// ```
/// use bundle_core::StatusReceiver;
/// use std::sync::Arc;
///
/// # async fn example() {
/// let receiver = Arc::new(StatusReceiver::new());
/// let producer = receiver.clone();
/// tokio::spawn(async move { producer.on_finished(0, "success") });
///
/// assert_eq!(receiver.result_code().await, 0);
/// assert_eq!(receiver.result_msg().await, "success");
/// # }
/// ```
#[derive(Debug)]
pub struct StatusReceiver {
    result: Completion<StatusResult>,
    wait: Duration,
}

impl StatusReceiver {
    /// Receiver waiting [`MINIMUM_WAITING_TIME`] seconds for its result.
    pub fn new() -> Self {
        Self::with_wait_time(Duration::from_secs(MINIMUM_WAITING_TIME))
    }

    pub fn with_wait_time(wait: Duration) -> Self {
        debug!("create status receiver instance, wait {:?}", wait);
        Self {
            result: Completion::new(),
            wait,
        }
    }

    /// Deliver the final result. Only the first call has an effect.
    pub fn on_finished(&self, code: ErrCode, message: &str) {
        info!("on finished result is {}, {}", code, message);
        let accepted = self.result.complete(StatusResult {
            code,
            message: message.to_string(),
        });
        if !accepted {
            warn!("status receiver already finished, dropping result {}", code);
        }
    }

    /// Progress report from the installer, in percent.
    pub fn on_status_notify(&self, progress: i32) {
        info!("on OnStatusNotify progress: {}", progress);
    }

    /// Wait for the result code, or [`ERR_OPERATION_TIME_OUT`] if none arrives in time.
    pub async fn result_code(&self) -> ErrCode {
        match self.result.wait(self.wait).await {
            Some(result) => result.code,
            None => {
                warn!("wait for installer result timed out after {:?}", self.wait);
                ERR_OPERATION_TIME_OUT
            }
        }
    }

    /// Wait for the result message, or an empty string on timeout.
    pub async fn result_msg(&self) -> String {
        self.result
            .wait(self.wait)
            .await
            .map(|result| result.message)
            .unwrap_or_default()
    }

    /// Wait for the complete result, substituting a timeout status when none arrives.
    pub async fn result(&self) -> StatusResult {
        self.result.wait(self.wait).await.unwrap_or(StatusResult {
            code: ERR_OPERATION_TIME_OUT,
            message: String::new(),
        })
    }
}

impl Default for StatusReceiver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::ERR_OK;
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready_eq};

    #[tokio::test]
    async fn test_first_result_wins() {
        let receiver = StatusReceiver::with_wait_time(Duration::from_millis(200));
        receiver.on_finished(ERR_OK, "success");
        receiver.on_finished(64, "late failure");

        assert_eq!(receiver.result_code().await, ERR_OK);
        assert_eq!(receiver.result_msg().await, "success");
    }

    #[tokio::test]
    async fn test_timeout_reports_sentinel() {
        let receiver = StatusReceiver::with_wait_time(Duration::from_millis(20));

        assert_eq!(receiver.result_code().await, ERR_OPERATION_TIME_OUT);
        assert_eq!(receiver.result_msg().await, "");
    }

    #[tokio::test]
    async fn test_waiter_is_woken_by_producer() {
        let receiver = StatusReceiver::with_wait_time(Duration::from_secs(5));
        let mut waiter = tokio_test::task::spawn(receiver.result_code());
        assert_pending!(waiter.poll());

        receiver.on_finished(65, "missing module");
        assert!(waiter.is_woken());
        assert_ready_eq!(waiter.poll(), 65);
    }

    #[tokio::test]
    async fn test_result_delivered_from_other_task() {
        let receiver = Arc::new(StatusReceiver::with_wait_time(Duration::from_secs(5)));
        let producer = receiver.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            producer.on_status_notify(50);
            producer.on_finished(ERR_OK, "success");
        });

        let result = receiver.result().await;
        assert_eq!(result.code, ERR_OK);
        assert_eq!(result.message, "success");
    }

    #[tokio::test]
    async fn test_racing_producers_store_one_value() {
        let completion = Arc::new(Completion::<i32>::new());
        let mut handles = Vec::new();
        for value in 0..16 {
            let completion = completion.clone();
            handles.push(tokio::spawn(async move { completion.complete(value) }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert!(completion.is_complete());
        assert!(completion.get().is_some());
    }

    #[test]
    fn test_default_wait_is_minimum() {
        let receiver = StatusReceiver::default();
        assert_eq!(receiver.wait, Duration::from_secs(MINIMUM_WAITING_TIME));
    }
}
