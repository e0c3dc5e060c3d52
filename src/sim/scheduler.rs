//! Cooperative tick scheduler
//!
//! One logical thread drives every periodic task. `advance` walks simulated time forward,
//! running each due callback to completion before looking for the next one:
//! - Earliest due time runs first; ties go to the earlier registration
//! - A task that fell behind catches up one period at a time
//! - Cancellation requested during a callback applies before the next dispatch
//! - The context is settled after every callback (deferred removals are purged there)

use std::time::Duration;

use crate::error::{Error, Result};

/// Handle returned by [`Scheduler::register_periodic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u32);

/// Hook run after every callback
pub trait Settle {
    fn settle(&mut self);
}

/// Cancellation requests collected while a callback runs
#[derive(Debug, Default)]
pub struct Cancellations {
    handles: Vec<TaskHandle>,
}

impl Cancellations {
    pub fn cancel(&mut self, handle: TaskHandle) {
        self.handles.push(handle);
    }
}

type Callback<C> = Box<dyn FnMut(&mut C, &mut Cancellations)>;

struct Task<C> {
    handle: TaskHandle,
    name: &'static str,
    period: Duration,
    next_due: Duration,
    cancelled: bool,
    callback: Callback<C>,
}

pub struct Scheduler<C> {
    now: Duration,
    tasks: Vec<Task<C>>,
    next_handle: u32,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| (t.name, t.period)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            tasks: Vec::new(),
            next_handle: 0,
        }
    }

    /// Register a task that first fires one `period` from now, then every `period`
    pub fn register_periodic<F>(
        &mut self,
        name: &'static str,
        period: Duration,
        callback: F,
    ) -> Result<TaskHandle>
    where
        F: FnMut(&mut C, &mut Cancellations) + 'static,
    {
        if period.is_zero() {
            return Err(Error::ZeroPeriod { task: name });
        }
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(Task {
            handle,
            name,
            period,
            next_due: self.now + period,
            cancelled: false,
            callback: Box::new(callback),
        });
        log::debug!("registered task `{}` every {:?}", name, period);
        Ok(handle)
    }

    /// Stop a task. Returns `false` if it was unknown or already cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self
            .tasks
            .iter_mut()
            .find(|t| t.handle == handle && !t.cancelled)
        {
            Some(task) => {
                task.cancelled = true;
                log::debug!("cancelled task `{}`", task.name);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle && !t.cancelled)
    }

    /// Simulated time since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Index of the next task due at or before `deadline`
    fn next_due(&self, deadline: Duration) -> Option<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.cancelled && t.next_due <= deadline)
            .min_by_key(|(_, t)| (t.next_due, t.handle))
            .map(|(i, _)| i)
    }
}

impl<C: Settle> Scheduler<C> {
    /// Run every callback that falls due within `elapsed`. Returns the number run.
    pub fn advance(&mut self, elapsed: Duration, ctx: &mut C) -> usize {
        let deadline = self.now + elapsed;
        let mut ran = 0;
        let mut cancellations = Cancellations::default();

        while let Some(idx) = self.next_due(deadline) {
            let task = &mut self.tasks[idx];
            self.now = task.next_due;
            task.next_due += task.period;
            (task.callback)(ctx, &mut cancellations);
            ran += 1;

            for handle in cancellations.handles.drain(..) {
                self.cancel(handle);
            }
            ctx.settle();
        }

        self.now = deadline;
        self.tasks.retain(|t| !t.cancelled);
        ran
    }
}
