// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SIGINT/SIGTERM handling.
//!
//! First signal: raise a flag the scheduler polls at its suspension points
//! so the run can persist INTERRUPTED and exit 130 gracefully. Second
//! signal: hard exit 130 immediately, the graceful path is taking too long.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};

/// Window in which a second signal is treated as an emphatic repeat rather
/// than an independent request.
const DOUBLE_SIGNAL_WINDOW: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct SignalWatcher {
    interrupted: Arc<AtomicBool>,
}

impl SignalWatcher {
    /// Install handlers and start the watcher task.
    pub fn install() -> std::io::Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::spawn(async move {
            tokio::select! {
                _ = sigint.recv() => {}
                _ = sigterm.recv() => {}
            }
            flag.store(true, Ordering::SeqCst);
            tracing::info!("interrupt received; finishing current step");
            let first_at = std::time::Instant::now();

            tokio::select! {
                _ = sigint.recv() => {}
                _ = sigterm.recv() => {}
            }
            if first_at.elapsed() >= DOUBLE_SIGNAL_WINDOW {
                tracing::warn!("second signal; graceful shutdown is stuck, forcing exit");
            }
            std::process::exit(130);
        });

        Ok(Self { interrupted })
    }

    /// Watcher that never fires (tests).
    pub fn disabled() -> Self {
        Self { interrupted: Arc::new(AtomicBool::new(false)) }
    }

    /// Pre-tripped watcher (tests exercising the interrupt path).
    pub fn tripped() -> Self {
        Self { interrupted: Arc::new(AtomicBool::new(true)) }
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}
