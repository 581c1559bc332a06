/// Observed state of a task's result channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Done,
}

/// How the pool winds down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Stop accepting work, run everything already queued, then join.
    Graceful,
    /// Stop accepting work, abandon queued tasks with `PoolClosed`, then join.
    Immediate,
}

#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub workers: usize,
    pub queued_tasks: usize,
    pub submitted_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
}

impl PoolMetrics {
    /// Tasks submitted but not yet terminal (queued or running).
    pub fn in_flight(&self) -> usize {
        self.submitted_tasks
            .saturating_sub(self.completed_tasks + self.failed_tasks)
    }

    pub fn success_rate(&self) -> f64 {
        let finished = self.completed_tasks + self.failed_tasks;
        if finished == 0 {
            return 1.0;
        }
        self.completed_tasks as f64 / finished as f64
    }
}
