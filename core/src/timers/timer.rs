//! Shared timer state machine
//!
//! Every variant is a `Timer<K>`: a cloneable handle around shared state
//! that the registry ticks while the timer is active. Variant behaviour
//! lives in a `TimerKind`.
//!
//! # States
//!
//! ```text
//!            start()              pause()
//!   Idle ───────────▶ Running ◀──────────▶ Paused
//!    ▲                  │   │    resume()     │
//!    │     stop()       │   │ completion      │ stop()
//!    └──────────────────┘   ▼                 │
//!    ▲               Finished                 │
//!    │   reset()        │                     │
//!    └──────────────────┴─────────────────────┘
//! ```
//!
//! A paused timer stays registered; its tick is a no-op.

use std::fmt;
use std::rc::{Rc, Weak};

use std::cell::RefCell;

use crate::tick::{TickHandle, TickHandler, TickKind, TickRegistry};

use super::events::TimerEvents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Completion condition reached; terminal until `reset()`
    Finished,
}

impl TimerState {
    /// Running or paused: the timer holds a registry slot.
    pub fn is_active(&self) -> bool {
        matches!(self, TimerState::Running | TimerState::Paused)
    }
}

/// What one tick produced. Events are fired from this after the timer's
/// state borrow is released.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub update: Option<f64>,
    pub pulsed: bool,
    pub stopped: bool,
}

// ═══════════════════════════════════════════════════════════════════════════
// Core state
// ═══════════════════════════════════════════════════════════════════════════

/// State common to every timer variant.
pub struct TimerCore {
    state: TimerState,
    current_time: f64,
    initial_time: f64,
    registry: Rc<TickRegistry>,
    registration: Option<TickHandle>,
}

impl TimerCore {
    fn new(registry: &Rc<TickRegistry>, initial_time: f64, current_time: f64) -> Self {
        Self {
            state: TimerState::Idle,
            current_time,
            initial_time,
            registry: Rc::clone(registry),
            registration: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn initial_time(&self) -> f64 {
        self.initial_time
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub(crate) fn set_current_time(&mut self, value: f64) {
        self.current_time = value;
    }

    pub(crate) fn set_initial_time(&mut self, value: f64) {
        self.initial_time = value;
    }

    fn start(&mut self, handler: Weak<dyn TickHandler>, start_value: f64) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }
        self.current_time = start_value;
        self.state = TimerState::Running;
        self.registration = Some(self.registry.register_weak(handler));
        true
    }

    fn stop_into(&mut self, next: TimerState) -> bool {
        if !self.state.is_active() {
            return false;
        }
        // Dropping the handle deregisters, even mid-dispatch.
        self.registration = None;
        self.state = next;
        true
    }

    pub(crate) fn stop(&mut self) -> bool {
        self.stop_into(TimerState::Idle)
    }

    /// Deregister and enter `Finished`.
    pub(crate) fn finish(&mut self) -> bool {
        self.stop_into(TimerState::Finished)
    }
}

impl fmt::Debug for TimerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerCore")
            .field("state", &self.state)
            .field("current_time", &self.current_time)
            .field("initial_time", &self.initial_time)
            .field("registry", &self.registry.kind())
            .field("registered", &self.registration.is_some())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Variant behaviour
// ═══════════════════════════════════════════════════════════════════════════

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// Variant-specific timer behaviour. Implemented by `Countdown`,
/// `Stopwatch`, and `Frequency`.
pub trait TimerKind: Sealed + fmt::Debug + 'static {
    const NAME: &'static str;

    /// Value `current_time` takes on `start()` and `reset()`.
    fn start_value(&self, core: &TimerCore) -> f64;

    /// Advance one registry pass. Only called while running.
    fn advance(&mut self, core: &mut TimerCore, delta: f64) -> TickOutcome;

    fn is_finished(&self, core: &TimerCore) -> bool;
}

pub(crate) struct TimerBody<K> {
    pub(crate) core: TimerCore,
    pub(crate) kind: K,
}

pub(crate) struct TimerShared<K> {
    pub(crate) body: RefCell<TimerBody<K>>,
    pub(crate) events: TimerEvents,
}

impl<K: TimerKind> TimerShared<K> {
    pub(crate) fn fire(&self, outcome: TickOutcome) {
        if let Some(current) = outcome.update {
            self.events.updated.emit(current);
        }
        if outcome.pulsed {
            self.events.ticked.emit(());
        }
        if outcome.stopped {
            tracing::debug!(kind = K::NAME, "timer completed");
            self.events.stopped.emit(());
        }
    }
}

impl<K: TimerKind> TickHandler for TimerShared<K> {
    fn tick(&self, delta: f64) {
        if !delta.is_finite() || delta < 0.0 {
            tracing::warn!(kind = K::NAME, delta, "ignoring invalid tick delta");
            return;
        }

        let outcome = {
            let mut body = self.body.borrow_mut();
            if !body.core.is_running() {
                return;
            }
            let TimerBody { core, kind } = &mut *body;
            kind.advance(core, delta)
        };

        self.fire(outcome);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Public handle
// ═══════════════════════════════════════════════════════════════════════════

/// Cloneable handle to one timer. Clones refer to the same timer.
///
/// The timer stays registered only while at least one handle is alive;
/// dropping the last handle releases the registry slot.
pub struct Timer<K: TimerKind> {
    pub(crate) shared: Rc<TimerShared<K>>,
}

impl<K: TimerKind> Timer<K> {
    pub(crate) fn from_parts(
        registry: &Rc<TickRegistry>,
        kind: K,
        initial_time: f64,
        current_time: f64,
    ) -> Self {
        Self {
            shared: Rc::new(TimerShared {
                body: RefCell::new(TimerBody {
                    core: TimerCore::new(registry, initial_time, current_time),
                    kind,
                }),
                events: TimerEvents::default(),
            }),
        }
    }

    fn as_handler(&self) -> Weak<dyn TickHandler> {
        Rc::downgrade(&self.shared) as Weak<dyn TickHandler>
    }

    /// Start from the variant's start value. No-op unless Idle.
    pub fn start(&self) -> bool {
        let handler = self.as_handler();
        let started = {
            let mut body = self.shared.body.borrow_mut();
            let TimerBody { core, kind } = &mut *body;
            let start_value = kind.start_value(core);
            core.start(handler, start_value)
        };
        self.after_start(started)
    }

    /// Start with an explicit `current_time` instead of the start value.
    pub(crate) fn start_from(&self, current_time: f64) -> bool {
        let handler = self.as_handler();
        let started = self
            .shared
            .body
            .borrow_mut()
            .core
            .start(handler, current_time);
        self.after_start(started)
    }

    fn after_start(&self, started: bool) -> bool {
        if started {
            tracing::debug!(kind = K::NAME, current_time = self.current_time(), "timer started");
            self.shared.events.started.emit(());
        }
        started
    }

    /// Leave Running/Paused and deregister. Fires `on_timer_stop`.
    pub fn stop(&self) -> bool {
        let stopped = self.shared.body.borrow_mut().core.stop();
        if stopped {
            tracing::debug!(kind = K::NAME, "timer stopped");
            self.shared.events.stopped.emit(());
        }
        stopped
    }

    /// Freeze `current_time` while staying registered.
    pub fn pause(&self) -> bool {
        let mut body = self.shared.body.borrow_mut();
        if body.core.state != TimerState::Running {
            return false;
        }
        body.core.state = TimerState::Paused;
        true
    }

    pub fn resume(&self) -> bool {
        let mut body = self.shared.body.borrow_mut();
        if body.core.state != TimerState::Paused {
            return false;
        }
        body.core.state = TimerState::Running;
        true
    }

    /// Restore `current_time` to the start value. Running and paused timers
    /// keep their state; a finished timer returns to Idle.
    pub fn reset(&self) {
        let mut body = self.shared.body.borrow_mut();
        let TimerBody { core, kind } = &mut *body;
        core.current_time = kind.start_value(core);
        if core.state == TimerState::Finished {
            core.state = TimerState::Idle;
        }
    }

    /// Deregister and drop every subscriber. No events fire.
    pub fn dispose(&self) {
        self.shared.events.clear();
        let mut body = self.shared.body.borrow_mut();
        body.core.registration = None;
        if body.core.state.is_active() {
            body.core.state = TimerState::Idle;
        }
    }

    pub fn state(&self) -> TimerState {
        self.shared.body.borrow().core.state
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TimerState::Paused
    }

    pub fn is_finished(&self) -> bool {
        let body = self.shared.body.borrow();
        body.kind.is_finished(&body.core)
    }

    pub fn current_time(&self) -> f64 {
        self.shared.body.borrow().core.current_time
    }

    pub fn initial_time(&self) -> f64 {
        self.shared.body.borrow().core.initial_time
    }

    /// `current_time / initial_time`, clamped to `[0, 1]`; zero when the
    /// initial time is zero.
    pub fn progress(&self) -> f64 {
        let body = self.shared.body.borrow();
        let initial = body.core.initial_time;
        if initial > 0.0 {
            (body.core.current_time / initial).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Which dispatch pass drives this timer.
    pub fn tick_kind(&self) -> TickKind {
        self.shared.body.borrow().core.registry.kind()
    }

    /// Whether the timer currently holds a registry slot.
    pub fn is_registered(&self) -> bool {
        self.shared
            .body
            .borrow()
            .core
            .registration
            .as_ref()
            .is_some_and(TickHandle::is_registered)
    }

    pub fn on_timer_start(&self, mut listener: impl FnMut() + 'static) {
        self.shared.events.started.subscribe(move |()| listener());
    }

    pub fn on_timer_stop(&self, mut listener: impl FnMut() + 'static) {
        self.shared.events.stopped.subscribe(move |()| listener());
    }

    pub fn on_timer_update(&self, listener: impl FnMut(f64) + 'static) {
        self.shared.events.updated.subscribe(listener);
    }

    pub fn clear_listeners(&self) {
        self.shared.events.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.shared.events.listener_count()
    }

    /// Whether two handles refer to the same timer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Run `f` against the variant state.
    pub(crate) fn with_body<R>(&self, f: impl FnOnce(&mut TimerCore, &mut K) -> R) -> R {
        let mut body = self.shared.body.borrow_mut();
        let TimerBody { core, kind } = &mut *body;
        f(core, kind)
    }
}

impl<K: TimerKind> Clone for Timer<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<K: TimerKind> fmt::Debug for Timer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shared.body.try_borrow() {
            Ok(body) => f
                .debug_struct("Timer")
                .field("kind", &body.kind)
                .field("core", &body.core)
                .finish(),
            Err(_) => f.debug_struct("Timer").field("kind", &K::NAME).finish_non_exhaustive(),
        }
    }
}
