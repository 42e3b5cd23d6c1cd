// src/services/toast.rs

//! Transient outcome notifications.
//!
//! At most one toast is visible. Showing a new one replaces the current
//! toast and restarts the dismiss timer; the timer is owned by the
//! [`Toaster`] and aborted when it is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

struct Shared {
    current: watch::Sender<Option<Toast>>,
    generation: AtomicU64,
}

pub struct Toaster {
    dismiss_after: Duration,
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Toaster {
    pub fn new(dismiss_after: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            dismiss_after,
            shared: Arc::new(Shared {
                current,
                generation: AtomicU64::new(0),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Watch the visible toast.
    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.shared.current.subscribe()
    }

    /// The visible toast, if any.
    pub fn current(&self) -> Option<Toast> {
        self.shared.current.borrow().clone()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    /// Replace the visible toast and restart the dismiss timer.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let toast = Toast {
            message: message.into(),
            kind,
        };
        match kind {
            ToastKind::Success => log::info!("{}", toast.message),
            ToastKind::Error => log::warn!("{}", toast.message),
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.current.send_replace(Some(toast));

        // Without a runtime the toast stays until replaced or dismissed.
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let shared = Arc::clone(&self.shared);
        let delay = self.dismiss_after;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if shared.generation.load(Ordering::SeqCst) == generation {
                shared.current.send_replace(None);
            }
        });

        let previous = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Hide the visible toast now.
    pub fn dismiss(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.current.send_replace(None);
        self.cancel_timer();
    }

    fn cancel_timer(&self) {
        let pending = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pending) = pending {
            pending.abort();
        }
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
