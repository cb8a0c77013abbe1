use std::panic::AssertUnwindSafe;
use std::sync::mpsc::{self, Receiver, Sender};

use super::bulk::BulkReport;
use super::compare::ComparePlan;
use crate::model::{ComparisonResult, ExperimentId, ExperimentTable, FilterPredicate, TextField};

/// What a background task hands back to the UI thread.
#[derive(Debug)]
pub enum Completion {
    TableLoaded {
        filter: FilterPredicate,
        result: anyhow::Result<ExperimentTable>,
    },
    TagsLoaded(anyhow::Result<Vec<String>>),
    BulkFinished(BulkReport),
    Compared {
        plan: ComparePlan,
        result: anyhow::Result<ComparisonResult>,
    },
    DetailLoaded {
        id: ExperimentId,
        result: anyhow::Result<String>,
    },
    Restored {
        id: ExperimentId,
        result: anyhow::Result<()>,
    },
    TextSaved {
        id: ExperimentId,
        field: TextField,
        result: anyhow::Result<()>,
    },
    Panicked {
        label: &'static str,
    },
}

/// Worker threads plus the channel they report on. Only the owner of the
/// queue (the UI thread) ever sees completions, in arrival order.
pub(super) struct TaskQueue {
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl TaskQueue {
    pub(super) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub(super) fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(super) fn spawn<F>(&mut self, label: &'static str, job: F)
    where
        F: FnOnce() -> Completion + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tracing::debug!(task = label, "spawn");
        let spawned = std::thread::Builder::new()
            .name(format!("exprec-{}", label))
            .spawn(move || {
                let completion = std::panic::catch_unwind(AssertUnwindSafe(job))
                    .unwrap_or(Completion::Panicked { label });
                let _ = tx.send(completion);
            });
        if let Err(err) = spawned {
            tracing::warn!(task = label, error = %err, "failed to spawn worker thread");
            let _ = self.tx.send(Completion::Panicked { label });
        }
    }

    pub(super) fn try_next(&mut self) -> Option<Completion> {
        let c = self.rx.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(c)
    }

    /// Block for the next completion; `None` when nothing is in flight.
    pub(super) fn next_blocking(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let c = self.rx.recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(c)
    }
}
