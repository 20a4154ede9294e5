//! Dispatch context owned by a host loop

use std::rc::Rc;

use super::{TickKind, TickRegistry};

/// The two registries a host drives: one per rendered frame, one per fixed
/// step.
///
/// Anything that constructs timers receives a context (or one of its
/// registries) explicitly, so independent schedules never share state.
#[derive(Debug, Clone)]
pub struct TickContext {
    frame: Rc<TickRegistry>,
    fixed: Rc<TickRegistry>,
    fixed_step: f64,
}

impl TickContext {
    /// `fixed_step` is the delta, in seconds, passed to fixed-step handlers.
    pub fn new(fixed_step: f64) -> Self {
        let fixed_step = if fixed_step.is_finite() && fixed_step > 0.0 {
            fixed_step
        } else {
            tracing::warn!(fixed_step, "invalid fixed step, using 0.02s");
            0.02
        };

        Self {
            frame: TickRegistry::new(TickKind::Frame),
            fixed: TickRegistry::new(TickKind::Fixed),
            fixed_step,
        }
    }

    pub fn from_config(config: &hourglass_types::ScheduleConfig) -> Self {
        Self::new(config.fixed_step())
    }

    pub fn frame(&self) -> &Rc<TickRegistry> {
        &self.frame
    }

    pub fn fixed(&self) -> &Rc<TickRegistry> {
        &self.fixed
    }

    pub fn registry(&self, kind: TickKind) -> &Rc<TickRegistry> {
        match kind {
            TickKind::Frame => &self.frame,
            TickKind::Fixed => &self.fixed,
        }
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    /// Call exactly once per rendered frame.
    pub fn dispatch_frame(&self, delta_seconds: f64) {
        self.frame.dispatch(delta_seconds);
    }

    /// Call once per fixed step.
    pub fn dispatch_fixed(&self) {
        self.fixed.dispatch(self.fixed_step);
    }
}

impl Default for TickContext {
    fn default() -> Self {
        Self::new(hourglass_types::ScheduleConfig::default().fixed_step())
    }
}
