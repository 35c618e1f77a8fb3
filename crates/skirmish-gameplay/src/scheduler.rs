//! Timer facility for behaviours.
//!
//! A [`Scheduler`] owns a set of keyed timers driven by the host frame delta:
//! - Repeating timers (first delay, then a fixed interval)
//! - One-shot delayed tasks
//!
//! Each logical key holds at most one task. Scheduling a key that is already
//! pending replaces the old task, so a timer can never run twice in parallel.
//! Cancelling through a stale [`TaskHandle`] is a no-op.
//!
//! The clock is moved with [`Scheduler::advance`] and due tasks are drained
//! one at a time with [`Scheduler::pop_due`], which lets the caller cancel or
//! reschedule timers between two firings of the same frame.

use ahash::AHashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

/// Smallest interval accepted for repeating timers, in seconds.
pub const MIN_TIMER_INTERVAL: f32 = 0.001;

/// Slack when comparing due times with the clock. Frame deltas are `f32`, so
/// a sum like `0.9 + 0.1` lands just short of `1.0`.
pub const DUE_EPSILON: f64 = 1e-6;

/// Handle to one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// How a task repeats once it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cadence {
    Once,
    Repeating { interval: f64 },
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    handle: TaskHandle,
    due: f64,
    cadence: Cadence,
}

/// Keyed timer table advanced by frame deltas.
#[derive(Debug)]
pub struct Scheduler<K> {
    /// End of the window advanced so far
    clock: f64,
    /// Time of the task currently being fired (base for new schedules)
    cursor: f64,
    next_handle: u64,
    tasks: AHashMap<K, ScheduledTask>,
}

impl<K: Copy + Eq + Hash + Debug> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> Scheduler<K> {
    /// Creates an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            cursor: 0.0,
            next_handle: 1,
            tasks: AHashMap::new(),
        }
    }

    /// Current scheduler time in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.cursor
    }

    /// Schedules `key` to fire after `first_delay`, then every `interval`.
    pub fn schedule_repeating(&mut self, key: K, first_delay: f32, interval: f32) -> TaskHandle {
        let interval = f64::from(interval.max(MIN_TIMER_INTERVAL));
        self.insert(key, first_delay, Cadence::Repeating { interval })
    }

    /// Schedules `key` to fire once after `delay`.
    pub fn schedule_once(&mut self, key: K, delay: f32) -> TaskHandle {
        self.insert(key, delay, Cadence::Once)
    }

    fn insert(&mut self, key: K, delay: f32, cadence: Cadence) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        let task = ScheduledTask {
            handle,
            due: self.cursor + f64::from(delay.max(0.0)),
            cadence,
        };
        if let Some(previous) = self.tasks.insert(key, task) {
            trace!("Replaced pending {key:?} task {:?}", previous.handle);
        }
        handle
    }

    /// Cancels the task behind `handle`. Returns false if it no longer exists.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let key = self
            .tasks
            .iter()
            .find(|(_, task)| task.handle == handle)
            .map(|(key, _)| *key);
        match key {
            Some(key) => self.tasks.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancels whatever task is pending under `key`.
    pub fn cancel_key(&mut self, key: K) -> bool {
        self.tasks.remove(&key).is_some()
    }

    /// Cancels every pending task and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    /// Whether a task is pending under `key`.
    #[must_use]
    pub fn is_scheduled(&self, key: K) -> bool {
        self.tasks.contains_key(&key)
    }

    /// Handle of the task pending under `key`.
    #[must_use]
    pub fn handle_of(&self, key: K) -> Option<TaskHandle> {
        self.tasks.get(&key).map(|task| task.handle)
    }

    /// Seconds until `key` next fires, measured from the current time.
    #[must_use]
    pub fn time_until(&self, key: K) -> Option<f32> {
        self.tasks
            .get(&key)
            .map(|task| (task.due - self.cursor).max(0.0) as f32)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Moves the clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.clock += f64::from(dt.max(0.0));
    }

    /// Pops the earliest task due within the advanced window.
    ///
    /// Ties fire in scheduling order. Repeating tasks are re-armed one
    /// interval after their due time, so a long frame yields one firing per
    /// elapsed interval. Returns `None` once nothing else is due.
    pub fn pop_due(&mut self) -> Option<K> {
        let next = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= self.clock + DUE_EPSILON)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)))
            .map(|(key, task)| (*key, *task));

        let Some((key, task)) = next else {
            // A task fired within the slack may sit just past the clock
            self.cursor = self.cursor.max(self.clock);
            return None;
        };

        self.cursor = self.cursor.max(task.due);
        match task.cadence {
            Cadence::Once => {
                self.tasks.remove(&key);
            },
            Cadence::Repeating { interval } => {
                if let Some(entry) = self.tasks.get_mut(&key) {
                    entry.due += interval;
                }
            },
        }
        Some(key)
    }
}
