//! Experiment clock control.
//!
//! Generates the experiment clock-enable line. Two modes:
//! 1. **Manual:** The clock is enabled only while a STEP count is running.
//! 2. **Autonomous:** The clock is enabled on every cycle until PAUSE.
//!
//! Clock-enable is never stored. It is recomputed from `{mode, remaining}` each
//! cycle by [`CycleControl::clock_enable`], so a mode change or an expiring count
//! takes effect on exactly the next edge.

use tracing::debug;

use crate::common::constants::{STATUS_FLAG_AUTONOMOUS, STATUS_FLAG_STEPPING};
use crate::config::StepPolicy;

/// Clocking mode of the experiment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CycleMode {
    /// Clock enabled only while stepping.
    #[default]
    Manual,
    /// Clock enabled continuously.
    Autonomous,
}

/// Request raised by the EX stage toward cycle control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleTrigger {
    /// Enable the clock for this many edges.
    Step(u64),
    /// Switch to autonomous mode.
    Start,
    /// Return to manual idle.
    Pause,
}

/// Stored state of cycle control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleControl {
    /// Current clocking mode.
    pub mode: CycleMode,
    /// Enabled edges left in the current STEP. Always zero in autonomous mode.
    pub remaining: u64,
    /// Enabled edges since reset, wrapping at the value-field width.
    pub cycle_count: u64,
}

impl CycleControl {
    /// Manual idle, nothing counted. The state after reset.
    pub const fn new() -> Self {
        Self {
            mode: CycleMode::Manual,
            remaining: 0,
            cycle_count: 0,
        }
    }

    /// The experiment clock-enable line for the current cycle.
    #[inline]
    pub const fn clock_enable(&self) -> bool {
        matches!(self.mode, CycleMode::Autonomous) || self.remaining > 0
    }

    /// `true` while a counted STEP is in progress.
    #[inline]
    pub const fn stepping(&self) -> bool {
        matches!(self.mode, CycleMode::Manual) && self.remaining > 0
    }

    /// `true` in autonomous mode.
    #[inline]
    pub const fn autonomous(&self) -> bool {
        matches!(self.mode, CycleMode::Autonomous)
    }

    /// STATUS flag bits for the current state.
    pub const fn status_flags(&self) -> u64 {
        let mut flags = 0;
        if self.autonomous() {
            flags |= STATUS_FLAG_AUTONOMOUS;
        }
        if self.stepping() {
            flags |= STATUS_FLAG_STEPPING;
        }
        flags
    }

    /// Whether `trigger` would change state under `policy`.
    ///
    /// The EX stage uses this to pick between a success and a rejection response,
    /// and only raises triggers that are accepted.
    pub const fn accepts(&self, trigger: CycleTrigger, policy: StepPolicy) -> bool {
        match (trigger, self.mode) {
            (CycleTrigger::Step(_), CycleMode::Manual) => {
                self.remaining == 0 || !matches!(policy, StepPolicy::Ignore)
            }
            (CycleTrigger::Start, CycleMode::Manual)
            | (CycleTrigger::Pause, CycleMode::Autonomous) => true,
            _ => false,
        }
    }

    /// State after the coming clock edge.
    ///
    /// The enabled edge (if any) is counted first, then the trigger is applied,
    /// so a STEP(n) raised in cycle `t` enables the clock for cycles `t+1..=t+n`.
    /// Triggers that [`accepts`](Self::accepts) refuses are ignored.
    ///
    /// `count_mask` is the value-field mask: the cycle counter wraps at it and
    /// an extended step count saturates at it.
    pub fn next(&self, trigger: Option<CycleTrigger>, policy: StepPolicy, count_mask: u64) -> Self {
        let mut next = *self;

        if self.clock_enable() {
            next.cycle_count = self.cycle_count.wrapping_add(1) & count_mask;
            if !self.autonomous() {
                next.remaining = self.remaining.saturating_sub(1);
            }
        }

        let Some(trigger) = trigger.filter(|t| self.accepts(*t, policy)) else {
            return next;
        };

        match trigger {
            CycleTrigger::Step(cycles) => {
                next.remaining = if self.remaining == 0 {
                    cycles
                } else {
                    match policy {
                        StepPolicy::Ignore => next.remaining,
                        StepPolicy::Restart => cycles,
                        StepPolicy::Extend => {
                            next.remaining.saturating_add(cycles).min(count_mask)
                        }
                    }
                };
            }
            CycleTrigger::Start => {
                debug!(cycle_count = self.cycle_count, "cycle control: manual -> autonomous");
                next.mode = CycleMode::Autonomous;
                next.remaining = 0;
            }
            CycleTrigger::Pause => {
                debug!(cycle_count = next.cycle_count, "cycle control: autonomous -> manual");
                next.mode = CycleMode::Manual;
                next.remaining = 0;
            }
        }
        next
    }
}
