/// Task kinds the runner schedules against the virtual clock. All of
/// them are scoped to a single displayed step via the generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Second attempt to resolve the step target after a short delay
    ResolveRetry,
    /// Pre-action pause elapsed: apply auto-fill and the scripted action
    DispatchAction,
    /// Auto-advance to the next step
    Advance,
    /// Guided-mode check for the validation selector
    ValidationPoll,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    kind: TaskKind,
    generation: u64,
    due_ms: u64,
}

/// Single-outstanding-instance timer set. A task fires only if its
/// generation still matches the current step's; anything else is a stale
/// no-op, which is what makes step transitions race-free without threads.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Scheduler {
        Scheduler::default()
    }

    /// Schedule `kind` for the given generation. Replaces any pending
    /// task of the same kind and generation, so two advancement timers
    /// can never coexist for one step.
    pub fn schedule(&mut self, kind: TaskKind, generation: u64, due_ms: u64) {
        self.tasks
            .retain(|t| !(t.kind == kind && t.generation == generation));
        self.tasks.push(ScheduledTask {
            kind,
            generation,
            due_ms,
        });
    }

    pub fn cancel_kind(&mut self, kind: TaskKind) {
        self.tasks.retain(|t| t.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Earliest pending deadline, for pump loops that want to sleep.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.due_ms).min()
    }

    /// Pop every task due at `now_ms`, in deadline order. Tasks from
    /// superseded generations are silently discarded.
    pub fn take_due(&mut self, now_ms: u64, current_generation: u64) -> Vec<TaskKind> {
        let mut due: Vec<ScheduledTask> = Vec::new();
        self.tasks.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(*t);
                false
            } else {
                true
            }
        });

        due.sort_by_key(|t| t.due_ms);
        due.into_iter()
            .filter(|t| t.generation == current_generation)
            .map(|t| t.kind)
            .collect()
    }
}
