/// Deterministic timed task queue on the virtual clock.
///
/// Key properties:
/// - Total ordering on `(due, id)`: equal due times fire in schedule order.
/// - Cancellation does not perturb the order of remaining tasks.
/// - A task fires at most once; cancelled tasks never fire.
use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    due: Time,
    id: TaskId,
}

#[derive(Debug)]
struct Task<T> {
    key: Key,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    tasks: Vec<Task<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tasks.push(Task {
            key: Key { due, id },
            payload,
        });
        id
    }

    /// Removes a pending task. Returns `false` if it already fired or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let Some(idx) = self.tasks.iter().position(|t| t.key.id == id) else {
            return false;
        };
        self.tasks.remove(idx);
        true
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<Time> {
        self.tasks.iter().map(|t| t.key.due).min()
    }

    /// Pops the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Time) -> Option<(TaskId, Time, T)> {
        let mut best_idx: Option<usize> = None;
        for (idx, task) in self.tasks.iter().enumerate() {
            if task.key.due > now {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if task.key < self.tasks[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let task = self.tasks.remove(best_idx?);
        Some((task.key.id, task.key.due, task.payload))
    }
}
