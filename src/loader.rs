//! Background CSV loading for panels
//!
//! Each scheduled load runs on its own worker thread, which parses the file
//! into a detached [`PanelContent`] and posts a [`LoadResult`] on a bounded
//! channel. Nothing touches the panel collection off the interactive thread;
//! results are merged by [`PanelLoader::apply_pending`], called once per tick.
//!
//! Every load carries a ticket. The loader keeps the current target index of
//! each ticket and rewrites it when panels are removed, so a result always
//! lands on the panel it was scheduled for or is dropped.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::thread;

use crate::csv_io::{file_name_of, read_panel_csv};
use crate::model::panel::{Panel, PanelContent};

/// Capacity of the completion channel. Workers block while it is full.
pub const LOAD_QUEUE_CAPACITY: usize = 32;

/// A finished load, tagged with the ticket and panel index it was scheduled for
#[derive(Debug)]
pub struct LoadResult {
    pub ticket: u64,
    /// Index at scheduling time; the loader tracks where it has moved since
    pub index: usize,
    pub path: PathBuf,
    /// File name recorded on the panel (last path component)
    pub filename: String,
    pub outcome: Result<PanelContent, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Current panel index, or the scheduled one if the panel is gone
    pub index: usize,
    pub path: PathBuf,
    pub message: String,
}

/// Summary of one [`PanelLoader::apply_pending`] drain
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Indices whose content was replaced
    pub applied: Vec<usize>,
    pub failures: Vec<LoadFailure>,
    /// Results dropped because their panel no longer exists
    pub discarded: usize,
}

impl ApplyReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.failures.is_empty() && self.discarded == 0
    }
}

pub struct PanelLoader {
    tx: SyncSender<LoadResult>,
    rx: Receiver<LoadResult>,
    next_ticket: u64,
    /// Current target of each outstanding ticket; `None` once its panel is gone
    targets: HashMap<u64, Option<usize>>,
}

impl Default for PanelLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PanelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelLoader")
            .field("in_flight", &self.targets.len())
            .finish()
    }
}

impl PanelLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::sync_channel(LOAD_QUEUE_CAPACITY);
        Self {
            tx,
            rx,
            next_ticket: 0,
            targets: HashMap::new(),
        }
    }

    /// Loads scheduled but not yet merged
    pub fn in_flight(&self) -> usize {
        self.targets.len()
    }

    /// Start loading `path` for the panel at `index`. Returns immediately.
    ///
    /// Scheduling the same index twice is allowed; both results are applied
    /// in completion order.
    pub fn schedule_load(&mut self, index: usize, path: PathBuf) {
        let tx = self.tx.clone();
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.targets.insert(ticket, Some(index));
        tracing::debug!(ticket, index, path = %path.display(), "scheduling panel load");

        let spawned = thread::Builder::new()
            .name(format!("panel-load-{}", index))
            .spawn(move || {
                let outcome = read_panel_csv(&path).map_err(|e| e.to_string());
                let result = LoadResult {
                    ticket,
                    index,
                    filename: file_name_of(&path),
                    path,
                    outcome,
                };
                if tx.send(result).is_err() {
                    tracing::debug!(index, "panel loader dropped before load finished");
                }
            });

        if let Err(e) = spawned {
            self.targets.remove(&ticket);
            tracing::error!(index, "failed to spawn load thread: {}", e);
        }
    }

    /// Retarget outstanding loads after the panel at `removed` was deleted.
    ///
    /// Loads for that panel are dropped when they arrive; loads for later
    /// panels follow them down one slot.
    pub fn panel_removed(&mut self, removed: usize) {
        for target in self.targets.values_mut() {
            *target = match *target {
                Some(i) if i == removed => None,
                Some(i) if i > removed => Some(i - 1),
                other => other,
            };
        }
    }

    /// Drain every finished load without blocking and merge it into `panels`.
    pub fn apply_pending(&mut self, panels: &mut [Panel]) -> ApplyReport {
        let mut report = ApplyReport::default();

        loop {
            let result = match self.rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => break,
                // Unreachable while we hold a sender
                Err(TryRecvError::Disconnected) => break,
            };
            let target = self.targets.remove(&result.ticket).flatten();
            apply_result(result, target, panels, &mut report);
        }

        report
    }
}

fn apply_result(
    result: LoadResult,
    target: Option<usize>,
    panels: &mut [Panel],
    report: &mut ApplyReport,
) {
    let LoadResult {
        ticket,
        index: scheduled,
        path,
        filename,
        outcome,
    } = result;
    let panel = target.and_then(|i| panels.get_mut(i));
    let index = target.unwrap_or(scheduled);

    match outcome {
        Ok(content) => {
            let Some(panel) = panel else {
                tracing::debug!(ticket, scheduled, "discarding load for removed panel");
                report.discarded += 1;
                return;
            };
            panel.replace_content(content);
            panel.filename = Some(filename);
            panel.loaded = true;
            tracing::debug!(index, cols = panel.cols(), rows = panel.rows(), "panel loaded");
            report.applied.push(index);
        }
        Err(message) => {
            match panel {
                Some(panel) => {
                    panel.filename = Some(filename);
                    panel.loaded = false;
                }
                None => report.discarded += 1,
            }
            report.failures.push(LoadFailure {
                index,
                path,
                message,
            });
        }
    }
}
