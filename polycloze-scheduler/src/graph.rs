//! Frontier-based DAG executor.
//!
//! Tasks are registered with their dependencies. `execute` drains the
//! currently-ready frontier into a fixed worker pool without blocking,
//! then, once the frontier is empty but tasks remain in flight, waits
//! for at least one to complete before re-draining. This keeps workers
//! saturated without busy-polling: a worker that frees up unblocks its
//! dependents on the very next drain.

use std::collections::VecDeque;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::errors::SchedulerError;
use crate::freshness;
use crate::summary::{Summary, TaskSummary};
use crate::task::{Task, TaskId};

struct Node {
    task: Box<dyn Task>,
    deps: Vec<TaskId>,
}

/// A registered task DAG, ready to run once.
pub struct Graph {
    nodes: FxHashMap<TaskId, Node>,
    force_rebuild: bool,
}

enum WorkItem {
    Run(Box<dyn Task>),
}

struct WorkerOutcome {
    id: TaskId,
    start: Instant,
    end: Instant,
    result: Result<bool, Box<dyn std::error::Error + Send + Sync>>,
}

impl Graph {
    pub fn new(force_rebuild: bool) -> Self {
        Self { nodes: FxHashMap::default(), force_rebuild }
    }

    /// Registers a task and the identities it depends on. Calling this
    /// twice with the same `task.id()` keeps the first registration;
    /// pipeline code that builds the same per-language task from two
    /// different directions can call `add` unconditionally.
    pub fn add(&mut self, task: Box<dyn Task>, deps: Vec<TaskId>) {
        self.nodes.entry(task.id()).or_insert_with(|| Node { task, deps });
    }

    /// Runs every registered task whose freshness check says it's due,
    /// respecting dependency order, using up to `workers` OS threads.
    pub fn execute(mut self, workers: usize) -> Result<Summary, SchedulerError> {
        let workers = workers.max(1);

        let mut dependents: FxHashMap<TaskId, Vec<TaskId>> = FxHashMap::default();
        let mut remaining: FxHashMap<TaskId, usize> = FxHashMap::default();
        for (id, node) in &self.nodes {
            remaining.insert(id.clone(), node.deps.len());
            for dep in &node.deps {
                dependents.entry(dep.clone()).or_default().push(id.clone());
            }
        }

        let mut frontier: VecDeque<TaskId> =
            remaining.iter().filter(|(_, &count)| count == 0).map(|(id, _)| id.clone()).collect();

        let (work_tx, work_rx): (Sender<WorkItem>, Receiver<WorkItem>) = unbounded();
        let (result_tx, result_rx) = unbounded();

        let handles: Vec<_> = (0..workers)
            .map(|idx| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let force_rebuild = self.force_rebuild;
                thread::Builder::new()
                    .name(format!("polycloze-worker-{idx}"))
                    .spawn(move || worker_loop(work_rx, result_tx, force_rebuild))
                    .expect("failed to spawn scheduler worker thread")
            })
            .collect();
        drop(work_rx);
        drop(result_tx);

        let mut summary = Summary::default();
        let mut in_flight = 0usize;
        let mut first_error: Option<SchedulerError> = None;

        while !frontier.is_empty() || in_flight > 0 {
            while let Some(id) = frontier.pop_front() {
                let node = self.nodes.remove(&id).expect("frontier id must be registered");
                if first_error.is_some() {
                    continue;
                }
                debug!(task = %id, "dispatching task");
                work_tx.send(WorkItem::Run(node.task)).expect("worker pool closed early");
                in_flight += 1;
            }

            if in_flight == 0 {
                break;
            }

            let outcome = result_rx.recv().expect("worker pool closed before reporting");
            in_flight -= 1;

            match outcome.result {
                Ok(ran) => {
                    summary.push(TaskSummary {
                        id: outcome.id.clone(),
                        start: outcome.start,
                        end: outcome.end,
                        skipped: !ran,
                    });
                    if let Some(next) = dependents.remove(&outcome.id) {
                        for dep_id in next {
                            if let Some(count) = remaining.get_mut(&dep_id) {
                                *count -= 1;
                                if *count == 0 {
                                    frontier.push_back(dep_id);
                                }
                            }
                        }
                    }
                }
                Err(source) => {
                    warn!(task = %outcome.id, error = %source, "task failed");
                    summary.push(TaskSummary {
                        id: outcome.id.clone(),
                        start: outcome.start,
                        end: outcome.end,
                        skipped: false,
                    });
                    if first_error.is_none() {
                        first_error = Some(SchedulerError::TaskFailed { id: outcome.id, source });
                    }
                }
            }
        }

        drop(work_tx);
        for handle in handles {
            handle.join().map_err(|_| SchedulerError::WorkerPanicked)?;
        }

        summary.sort_by_start();

        if let Some(err) = first_error {
            return Err(err);
        }

        if !self.nodes.is_empty() {
            warn!(remaining = self.nodes.len(), "tasks never became ready: dependency cycle?");
        }

        info!(ran = summary.ran().count(), skipped = summary.skipped().count(), "graph execution complete");
        Ok(summary)
    }
}

fn worker_loop(rx: Receiver<WorkItem>, tx: Sender<WorkerOutcome>, force_rebuild: bool) {
    while let Ok(WorkItem::Run(task)) = rx.recv() {
        let id = task.id();
        let start = Instant::now();
        let result = run_one(task.as_ref(), force_rebuild);
        let end = Instant::now();
        if tx.send(WorkerOutcome { id, start, end, result }).is_err() {
            break;
        }
    }
}

fn run_one(
    task: &dyn Task,
    force_rebuild: bool,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    let outdated = freshness::is_outdated(&task.inputs(), &task.outputs(), force_rebuild)?;
    if !outdated {
        debug!(task = %task.id(), "skipping, up to date");
        return Ok(false);
    }
    task.run()?;
    Ok(true)
}
