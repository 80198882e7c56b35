use crate::field::FieldId;
use std::collections::HashMap;

/// Work a field asks to run once the current event turn has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Collapse the caret onto the first slot still showing its placeholder.
    PlaceCaretAtFirstAvailable,
    /// Select the whole mask range.
    SelectAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTask {
    pub target: FieldId,
    pub action: DeferredAction,
}

#[derive(Debug, Clone)]
struct Pending {
    task: DeferredTask,
    version: u64,
}

/// Post-turn continuation queue.
///
/// Hosts call [`Scheduler::drain_ready`] after dispatching an event and hand
/// each task back to its field. A newer task for the same field supersedes
/// one that has not run yet.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<Pending>,
    versions: HashMap<FieldId, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after_turn(&mut self, target: FieldId, action: DeferredAction) {
        let version = self.bump_version(&target);
        self.pending.push(Pending {
            task: DeferredTask { target, action },
            version,
        });
    }

    pub fn cancel(&mut self, target: &FieldId) {
        self.bump_version(target);
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain_ready(&mut self) -> Vec<DeferredTask> {
        let pending = std::mem::take(&mut self.pending);
        let ready: Vec<DeferredTask> = pending
            .into_iter()
            .filter(|pending| self.is_current(pending))
            .map(|pending| pending.task)
            .collect();
        self.versions.clear();
        ready
    }

    fn is_current(&self, pending: &Pending) -> bool {
        self.versions.get(&pending.task.target).copied().unwrap_or(0) == pending.version
    }

    fn bump_version(&mut self, target: &FieldId) -> u64 {
        let entry = self.versions.entry(target.clone()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}
