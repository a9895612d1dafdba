//! Transaction status polling
//!
//! Keeps a displayed transaction fresh while it is in a non-terminal state.
//! A session is a single task that re-fetches the transaction on a fixed
//! interval and publishes snapshots over a watch channel. Fetches are
//! serialized inside the task and every published snapshot carries a
//! monotonic sequence number, so an older response can never overwrite a
//! newer one. A failed tick is logged and skipped; the session keeps going.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::{
    api::BorrowingApi,
    config::PollingConfig,
    error::AppResult,
    models::BorrowingDetail,
};

/// One published snapshot of the polled transaction
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// Monotonic per-session sequence; 0 is the initial fetch
    pub seq: u64,
    pub detail: BorrowingDetail,
}

/// Poller factory bound to an API handle and an interval
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn BorrowingApi>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn BorrowingApi>, config: &PollingConfig) -> Self {
        Self {
            api,
            interval: Duration::from_secs(config.interval_secs.max(1)),
        }
    }

    /// Fetch the transaction once and, if its status is non-terminal,
    /// start a polling session for it.
    ///
    /// A failed initial fetch is returned as an error and no session
    /// starts; the caller decides whether to offer a manual retry.
    pub async fn start(&self, borrowing_id: i64) -> AppResult<PollSession> {
        let initial = self.api.borrowing_detail(borrowing_id).await?;
        let status = initial.status.clone();

        let (tx, rx) = watch::channel(StatusUpdate {
            seq: 0,
            detail: initial,
        });

        if status.is_terminal() {
            tracing::debug!(borrowing_id, %status, "Transaction already settled, not polling");
            return Ok(PollSession {
                rx,
                cancel: None,
                task: None,
            });
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(poll_loop(
            self.api.clone(),
            borrowing_id,
            self.interval,
            tx,
            cancel_rx,
        ));

        Ok(PollSession {
            rx,
            cancel: Some(cancel_tx),
            task: Some(task),
        })
    }
}

async fn poll_loop(
    api: Arc<dyn BorrowingApi>,
    borrowing_id: i64,
    interval: Duration,
    tx: watch::Sender<StatusUpdate>,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately; consume it
    // so the first re-fetch happens one full interval after the initial one.
    ticker.tick().await;

    let mut last_status = tx.borrow().detail.status.clone();
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.changed() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            _ = cancel.changed() => break,
            result = api.borrowing_detail(borrowing_id) => result,
        };

        match fetched {
            Ok(detail) => {
                // Unchanged status produces no update signal, avoiding
                // redundant re-renders downstream.
                if detail.status == last_status {
                    continue;
                }
                last_status = detail.status.clone();
                seq += 1;
                let terminal = detail.status.is_terminal();
                tracing::debug!(borrowing_id, seq, status = %detail.status, "Status changed");
                let _ = tx.send(StatusUpdate { seq, detail });
                if terminal {
                    break;
                }
            }
            Err(e) => {
                // A single failed tick is not fatal; the next tick retries.
                tracing::warn!(borrowing_id, "Poll tick failed: {}", e);
            }
        }
    }
}

/// Handle to one running (or already settled) polling session
///
/// Dropping the session cancels the task, tying its lifetime to the
/// owning screen.
pub struct PollSession {
    rx: watch::Receiver<StatusUpdate>,
    cancel: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl PollSession {
    /// Latest published snapshot
    pub fn latest(&self) -> StatusUpdate {
        self.rx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<StatusUpdate> {
        self.rx.clone()
    }

    /// Whether the background task is still polling
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the session without waiting for the task to wind down
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Wait until the session settles (terminal status or cancellation)
    pub async fn join(mut self) -> StatusUpdate {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.rx.borrow().clone()
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One-at-a-time session slot for a screen
///
/// Starting a new watch stops whatever session was running before, so two
/// timers never race on the same view state.
#[derive(Default)]
pub struct StatusWatcher {
    session: Option<PollSession>,
}

impl StatusWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede any running session with a fresh one
    pub async fn watch(
        &mut self,
        poller: &StatusPoller,
        borrowing_id: i64,
    ) -> AppResult<&PollSession> {
        self.stop();
        let session = poller.start(borrowing_id).await?;
        Ok(self.session.insert(session))
    }

    pub fn current(&self) -> Option<&PollSession> {
        self.session.as_ref()
    }

    /// Cancel the running session, if any (screen unmount / focus loss)
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    use crate::api::MockBorrowingApi;
    use crate::error::AppError;
    use crate::models::{BorrowingDetail, BorrowingStatus};

    fn detail(status: &str) -> BorrowingDetail {
        BorrowingDetail {
            id: 9,
            status: BorrowingStatus::parse(status),
            qr_code: Some("QR-9".to_string()),
            items: Vec::new(),
            mhs_id: Some(3),
            user_name: None,
        }
    }

    fn config() -> PollingConfig {
        PollingConfig { interval_secs: 4 }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_terminal_then_stops() {
        let mut api = MockBorrowingApi::new();
        let mut seq = Sequence::new();
        // Initial fetch, an unchanged poll, a change, then terminal.
        // Exactly four calls: anything past "selesai" would panic the mock.
        for status in ["booked", "booked", "diproses", "selesai"] {
            let status = status.to_string();
            api.expect_borrowing_detail()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(detail(&status)));
        }

        let poller = StatusPoller::new(Arc::new(api), &config());
        let session = poller.start(9).await.unwrap();
        let mut rx = session.subscribe();

        assert_eq!(session.latest().seq, 0);
        assert_eq!(session.latest().detail.status, BorrowingStatus::Booked);

        // First change skips the unchanged "booked" poll entirely.
        rx.changed().await.unwrap();
        let update = rx.borrow().clone();
        assert_eq!(update.seq, 1);
        assert_eq!(update.detail.status, BorrowingStatus::Processing);

        let settled = session.join().await;
        assert_eq!(settled.seq, 2);
        assert_eq!(settled.detail.status, BorrowingStatus::Completed);
        assert!(settled.detail.status.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_is_skipped_not_fatal() {
        let mut api = MockBorrowingApi::new();
        let mut seq = Sequence::new();
        api.expect_borrowing_detail()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(detail("booked")));
        api.expect_borrowing_detail()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AppError::Internal("backend hiccup".to_string()))
            });
        api.expect_borrowing_detail()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(detail("selesai")));

        let poller = StatusPoller::new(Arc::new(api), &config());
        let session = poller.start(9).await.unwrap();

        let settled = session.join().await;
        assert_eq!(settled.detail.status, BorrowingStatus::Completed);
    }

    #[tokio::test]
    async fn test_failed_initial_fetch_starts_nothing() {
        let mut api = MockBorrowingApi::new();
        api.expect_borrowing_detail()
            .times(1)
            .returning(|_| Err(AppError::Internal("down".to_string())));

        let poller = StatusPoller::new(Arc::new(api), &config());
        assert!(poller.start(9).await.is_err());
    }

    #[tokio::test]
    async fn test_terminal_initial_status_does_not_poll() {
        let mut api = MockBorrowingApi::new();
        api.expect_borrowing_detail()
            .times(1)
            .returning(|_| Ok(detail("ditolak")));

        let poller = StatusPoller::new(Arc::new(api), &config());
        let session = poller.start(9).await.unwrap();

        assert!(!session.is_active());
        assert_eq!(session.latest().detail.status, BorrowingStatus::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_watch_supersedes_old_session() {
        let mut api = MockBorrowingApi::new();
        // Two initial fetches (one per watch); the first session is stopped
        // before its ticker ever fires again.
        api.expect_borrowing_detail()
            .times(2)
            .returning(|_| Ok(detail("booked")));

        let poller = StatusPoller::new(Arc::new(api), &config());
        let mut watcher = StatusWatcher::new();

        watcher.watch(&poller, 9).await.unwrap();
        watcher.watch(&poller, 9).await.unwrap();
        watcher.stop();

        assert!(watcher.current().is_none());
    }
}
