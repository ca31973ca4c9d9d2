//! Animation scheduler: a registry of per-particle timeline tasks.
//!
//! Every task is keyed by `(particle id, cycle kind)`. Twinkle and hue tasks
//! repeat forever; jitter tasks are one-shot and drop out of the registry when
//! they finish. [`Scheduler::cancel_all`] empties the registry and stops the
//! scheduler; it is idempotent.

use crate::config::StarFieldParams;
use crate::field::StarField;
use crate::prng::Xorshift64;
use crate::timeline::{HuePulse, JitterTween, TwinkleCycle};
use log::debug;
use std::collections::BTreeMap;

/// Which timeline a task drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CycleKind {
    Twinkle,
    HuePulse,
    Jitter,
}

/// Registry key of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    pub particle: usize,
    pub kind: CycleKind,
}

impl TaskKey {
    pub fn new(particle: usize, kind: CycleKind) -> Self {
        Self { particle, kind }
    }
}

#[derive(Debug, Clone)]
enum Task {
    Twinkle(TwinkleCycle),
    HuePulse(HuePulse),
    Jitter(JitterTween),
}

/// Animation phase of one particle as read by the projector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimelineValues {
    /// Twinkle-fade level in [0, 1].
    pub fade: f64,
    /// Hue-pulse blend in [0, 1].
    pub hue: f64,
    pub jitter_x: f64,
    pub jitter_y: f64,
}

/// Drives every particle's timelines from one frame tick.
#[derive(Debug)]
pub struct Scheduler {
    tasks: BTreeMap<TaskKey, Task>,
    rng: Xorshift64,
    params: StarFieldParams,
    stopped: bool,
}

impl Scheduler {
    /// Registers a twinkle and a hue-pulse task for every particle.
    pub fn start(field: &StarField, params: &StarFieldParams, mut rng: Xorshift64) -> Self {
        let mut tasks = BTreeMap::new();
        for p in field.particles() {
            tasks.insert(
                TaskKey::new(p.id(), CycleKind::Twinkle),
                Task::Twinkle(TwinkleCycle::new(&mut rng, params)),
            );
            tasks.insert(
                TaskKey::new(p.id(), CycleKind::HuePulse),
                Task::HuePulse(HuePulse::new(&mut rng, params)),
            );
        }
        debug!("scheduler started with {} tasks", tasks.len());
        Self {
            tasks,
            rng,
            params: params.clone(),
            stopped: false,
        }
    }

    /// Advances every registered task by `dt` milliseconds.
    ///
    /// Finished one-shot tasks are removed. No-op once stopped.
    pub fn advance(&mut self, dt: f64) {
        if self.stopped {
            return;
        }
        let rng = &mut self.rng;
        let params = &self.params;
        self.tasks.retain(|_, task| match task {
            Task::Twinkle(cycle) => {
                cycle.advance(dt, rng, params);
                true
            }
            Task::HuePulse(pulse) => {
                pulse.advance(dt, rng, params);
                true
            }
            Task::Jitter(tween) => {
                tween.advance(dt);
                !tween.is_finished()
            }
        });
    }

    /// Schedules a transition jitter for every particle id in `ids`,
    /// replacing any jitter still in flight. Ignored once stopped.
    pub fn schedule_jitter(&mut self, ids: impl IntoIterator<Item = usize>) {
        if self.stopped {
            return;
        }
        for id in ids {
            let tween = JitterTween::new(&mut self.rng, &self.params);
            self.tasks
                .insert(TaskKey::new(id, CycleKind::Jitter), Task::Jitter(tween));
        }
    }

    /// Cancels every task. Calling it again does nothing.
    pub fn cancel_all(&mut self) {
        if self.stopped {
            return;
        }
        debug!("scheduler cancelling {} tasks", self.tasks.len());
        self.tasks.clear();
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn has_task(&self, key: TaskKey) -> bool {
        self.tasks.contains_key(&key)
    }

    /// Current animation phase of a particle. Missing tasks read as zero.
    pub fn values(&self, particle: usize) -> TimelineValues {
        let mut values = TimelineValues::default();
        if let Some(Task::Twinkle(c)) = self.tasks.get(&TaskKey::new(particle, CycleKind::Twinkle))
        {
            values.fade = c.level();
        }
        if let Some(Task::HuePulse(h)) =
            self.tasks.get(&TaskKey::new(particle, CycleKind::HuePulse))
        {
            values.hue = h.level();
        }
        if let Some(Task::Jitter(j)) = self.tasks.get(&TaskKey::new(particle, CycleKind::Jitter)) {
            (values.jitter_x, values.jitter_y) = j.offset();
        }
        values
    }
}
