//! Playback timer on a background thread.
//!
//! Each run sleeps for the shared interval, then posts the run's generation
//! to the UI loop. The interval is re-read before every wait, so a change
//! applies from the next tick. Stopping only flags the run; a tick already
//! on its way is dropped by the playback controller's generation check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use scoredist_core::Scheduler;

/// Tick posted by a timer run, tagged with the generation it was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

pub struct ThreadTicker {
    tick_tx: Sender<Tick>,
    interval_ms: Arc<AtomicU64>,
    /// Stop flag of the current run, if any.
    running: Option<Arc<AtomicBool>>,
}

impl ThreadTicker {
    pub fn new() -> (Self, Receiver<Tick>) {
        let (tick_tx, tick_rx) = channel();
        let ticker = Self {
            tick_tx,
            interval_ms: Arc::new(AtomicU64::new(0)),
            running: None,
        };
        (ticker, tick_rx)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl Scheduler for ThreadTicker {
    fn start(&mut self, interval_ms: u64, generation: u64) {
        self.stop();
        self.interval_ms.store(interval_ms, Ordering::SeqCst);

        let stopped = Arc::new(AtomicBool::new(false));
        let run = TickerRun {
            tick_tx: self.tick_tx.clone(),
            interval_ms: self.interval_ms.clone(),
            stopped: stopped.clone(),
            generation,
        };
        thread::spawn(move || run.run());

        self.running = Some(stopped);
        tracing::debug!(interval_ms, generation, "ticker started");
    }

    fn stop(&mut self) {
        if let Some(stopped) = self.running.take() {
            stopped.store(true, Ordering::SeqCst);
            tracing::debug!("ticker stopped");
        }
    }

    fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms.store(interval_ms, Ordering::SeqCst);
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

struct TickerRun {
    tick_tx: Sender<Tick>,
    interval_ms: Arc<AtomicU64>,
    stopped: Arc<AtomicBool>,
    generation: u64,
}

impl TickerRun {
    fn run(self) {
        loop {
            thread::sleep(Duration::from_millis(self.interval_ms.load(Ordering::SeqCst)));
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }
            let tick = Tick {
                generation: self.generation,
            };
            if self.tick_tx.send(tick).is_err() {
                break;
            }
        }
    }
}
