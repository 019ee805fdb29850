//! Deferred work queue.
//!
//! Some native text controls ignore text/caret changes made synchronously inside their own
//! change notifications, so the engine re-applies corrections on the next event-loop turn. Each
//! generation-sensitive task records the generation it was scheduled under; if the controller's
//! generation has moved on by the time the task runs, the task is discarded.

use std::collections::VecDeque;

/// A unit of deferred work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Re-apply a token correction to the host and end the correction's pending window.
    ConfirmCorrection {
        /// Generation stamped when the correction was committed.
        generation: u64,
        /// Cursor to place (character offset).
        cursor: usize,
    },
    /// Push a relocated caret to the host.
    RelocateCursor {
        /// Generation stamped when the relocation was computed.
        generation: u64,
        /// Cursor to place (character offset).
        cursor: usize,
    },
    /// Re-apply token formatting to the live text.
    ApplyFormatting,
}

impl DeferredTask {
    /// The generation this task is bound to, if any.
    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::ConfirmCorrection { generation, .. } | Self::RelocateCursor { generation, .. } => {
                Some(*generation)
            }
            Self::ApplyFormatting => None,
        }
    }
}

/// FIFO of deferred tasks, run one batch per tick.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    tasks: VecDeque<DeferredTask>,
}

impl DeferredQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task. At most one [`DeferredTask::ApplyFormatting`] is kept queued.
    ///
    /// Returns `false` if the task was coalesced into an existing one.
    pub fn push(&mut self, task: DeferredTask) -> bool {
        if task == DeferredTask::ApplyFormatting && self.tasks.contains(&task) {
            return false;
        }
        self.tasks.push_back(task);
        true
    }

    /// Take every task queued so far. Tasks pushed afterwards belong to the next tick.
    pub fn take_batch(&mut self) -> Vec<DeferredTask> {
        self.tasks.drain(..).collect()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every queued task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
