use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::debug;

use crate::view::PanelView;

pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Increases with every alert shown by one presenter.
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
}

/// Single-slot status area. A new alert replaces the current one, and every
/// alert clears itself after `duration` unless a newer one took its place.
pub struct AlertPresenter<V: PanelView> {
    view: Arc<V>,
    current: Arc<Mutex<u64>>,
    duration: Duration,
}

impl<V: PanelView> AlertPresenter<V> {
    pub fn new(view: Arc<V>, duration: Duration) -> Self {
        Self {
            view,
            current: Arc::new(Mutex::new(0)),
            duration,
        }
    }

    pub async fn success(&self, message: impl Into<String>) -> u64 {
        self.show(AlertKind::Success, message.into()).await
    }

    pub async fn error(&self, message: impl Into<String>) -> u64 {
        self.show(AlertKind::Error, message.into()).await
    }

    /// Id of the most recent alert, visible or already cleared. Zero before
    /// the first alert.
    pub async fn current_id(&self) -> u64 {
        *self.current.lock().await
    }

    async fn show(&self, kind: AlertKind, message: String) -> u64 {
        let id = {
            let mut current = self.current.lock().await;
            *current += 1;
            let alert = Alert {
                id: *current,
                kind,
                message,
            };
            self.view.show_alert(&alert);
            alert.id
        };

        let view = Arc::clone(&self.view);
        let current = Arc::clone(&self.current);
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let current = current.lock().await;
            if *current == id {
                view.clear_alert(id);
            } else {
                debug!(alert_id = id, newer = *current, "alert already replaced");
            }
        });

        id
    }
}

#[cfg(test)]
#[path = "tests/alert_tests.rs"]
mod tests;
