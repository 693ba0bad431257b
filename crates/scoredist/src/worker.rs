//! Background worker that fetches series without blocking the UI.
//!
//! Requests carry the [`RequestTicket`] the session issued for them and
//! every response echoes it back, so the session can drop anything that
//! was superseded while in flight. Requests that queue up behind a slow
//! fetch are coalesced: only the newest one is actually fetched.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use scoredist_core::FetchError;
use scoredist_core::session::RequestTicket;
use scoredist_core::wire::{DistributionQuery, DistributionResponse};

use crate::source::DistributionSource;

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub ticket: RequestTicket,
    pub query: DistributionQuery,
}

#[derive(Debug)]
enum WorkerRequest {
    Fetch(FetchRequest),
    Shutdown,
}

#[derive(Debug)]
pub struct FetchResponse {
    pub ticket: RequestTicket,
    pub result: Result<DistributionResponse, FetchError>,
}

pub struct FetchWorker {
    request_tx: Sender<WorkerRequest>,
    response_rx: Receiver<FetchResponse>,
    thread: Option<JoinHandle<()>>,
    /// Set while the worker is inside `DistributionSource::fetch`.
    busy: Arc<AtomicBool>,
}

impl FetchWorker {
    pub fn new(source: Box<dyn DistributionSource>) -> Self {
        let (request_tx, request_rx) = channel();
        let (response_tx, response_rx) = channel();

        let busy = Arc::new(AtomicBool::new(false));
        let context = WorkerContext {
            source,
            response_tx,
            busy: busy.clone(),
        };
        let thread = thread::spawn(move || context.run(request_rx));

        Self {
            request_tx,
            response_rx,
            thread: Some(thread),
            busy,
        }
    }

    /// Queue a fetch. Returns false if the worker has gone away.
    pub fn send(&self, request: FetchRequest) -> bool {
        self.request_tx.send(WorkerRequest::Fetch(request)).is_ok()
    }

    /// Try to receive a response (non-blocking)
    pub fn try_recv(&self) -> Option<FetchResponse> {
        self.response_rx.try_recv().ok()
    }

    /// Block for the next response. Used by tests and headless callers.
    pub fn recv(&self) -> Option<FetchResponse> {
        self.response_rx.recv().ok()
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
    }
}

impl Drop for FetchWorker {
    /// Joins an idle worker. One still inside a fetch is detached instead:
    /// it exits once the fetch returns and the response channel is gone.
    fn drop(&mut self) {
        self.shutdown();
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.is_finished() || !self.busy.load(Ordering::SeqCst) {
            let _ = thread.join();
        } else {
            tracing::debug!("detaching fetch worker with a request in flight");
        }
    }
}

struct WorkerContext {
    source: Box<dyn DistributionSource>,
    response_tx: Sender<FetchResponse>,
    busy: Arc<AtomicBool>,
}

impl WorkerContext {
    fn run(&self, request_rx: Receiver<WorkerRequest>) {
        while let Ok(request) = request_rx.recv() {
            let WorkerRequest::Fetch(mut latest) = request else {
                break;
            };

            let mut shutdown = false;
            while let Ok(queued) = request_rx.try_recv() {
                match queued {
                    WorkerRequest::Fetch(newer) => {
                        tracing::debug!(
                            skipped = latest.ticket.id(),
                            ticket = newer.ticket.id(),
                            "skipping superseded fetch"
                        );
                        latest = newer;
                    }
                    WorkerRequest::Shutdown => {
                        shutdown = true;
                        break;
                    }
                }
            }
            if shutdown {
                break;
            }

            tracing::info!(
                ticket = latest.ticket.id(),
                source = %self.source.describe(),
                index = %latest.query.index,
                start = %latest.query.start_date,
                end = %latest.query.end_date,
                "fetching distribution"
            );
            self.busy.store(true, Ordering::SeqCst);
            let result = self.source.fetch(&latest.query);
            self.busy.store(false, Ordering::SeqCst);
            if let Err(err) = &result {
                tracing::warn!(ticket = latest.ticket.id(), error = %err, "fetch failed");
            }

            let response = FetchResponse {
                ticket: latest.ticket,
                result,
            };
            if self.response_tx.send(response).is_err() {
                break;
            }
        }
        tracing::debug!("fetch worker stopped");
    }
}
