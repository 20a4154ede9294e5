//! Tests for the timer state machine and its variants

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{CountdownTimer, FrequencyTimer, StopwatchTimer, TimerError, TimerState};
use crate::tick::{TickContext, TickKind};

fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

fn bump(c: &Rc<Cell<u32>>) -> impl FnMut() + 'static {
    let c = Rc::clone(c);
    move || c.set(c.get() + 1)
}

/// Start and promote the registration so the next dispatch ticks the timer.
fn started_countdown(ctx: &TickContext, duration: f64) -> CountdownTimer {
    let timer = CountdownTimer::new(ctx.frame(), duration).unwrap();
    assert!(timer.start());
    ctx.dispatch_frame(0.0);
    timer
}

// ─── Countdown ─────────────────────────────────────────────────────────────

#[test]
fn countdown_starts_idle_and_registers_on_start() {
    let ctx = TickContext::default();
    let timer = CountdownTimer::new(ctx.frame(), 5.0).unwrap();
    assert_eq!(timer.state(), TimerState::Idle);
    assert!(ctx.frame().is_empty());

    let starts = counter();
    timer.on_timer_start(bump(&starts));
    assert!(timer.start());
    assert_eq!(starts.get(), 1);
    assert_eq!(timer.state(), TimerState::Running);
    assert_eq!(ctx.frame().pending_len(), 1);
    assert_eq!(timer.tick_kind(), TickKind::Frame);
}

#[test]
fn countdown_rejects_invalid_duration() {
    let ctx = TickContext::default();
    assert_eq!(
        CountdownTimer::new(ctx.frame(), -1.0).unwrap_err(),
        TimerError::InvalidDuration { duration: -1.0 }
    );
    assert!(CountdownTimer::new(ctx.frame(), f64::INFINITY).is_err());
}

#[test]
fn countdown_start_while_running_is_noop() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 5.0);
    ctx.dispatch_frame(1.0);

    assert!(!timer.start());
    assert!((timer.current_time() - 4.0).abs() < 1e-9);
    assert_eq!(ctx.frame().len(), 1);
}

#[test]
fn countdown_decrements_and_reports_updates() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 3.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        timer.on_timer_update(move |t| seen.borrow_mut().push(t));
    }

    ctx.dispatch_frame(1.0);
    ctx.dispatch_frame(0.5);
    assert_eq!(*seen.borrow(), vec![2.0, 1.5]);
    assert!((timer.progress() - 0.5).abs() < 1e-9);
}

#[test]
fn countdown_clamps_to_zero_and_auto_stops_in_same_tick() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 1.0);
    let stops = counter();
    timer.on_timer_stop(bump(&stops));

    ctx.dispatch_frame(2.5);
    assert_eq!(timer.current_time(), 0.0);
    assert_eq!(timer.state(), TimerState::Finished);
    assert!(timer.is_finished());
    assert_eq!(stops.get(), 1);
    assert!(ctx.frame().is_empty(), "finished timer must deregister itself");

    ctx.dispatch_frame(1.0);
    assert_eq!(stops.get(), 1);
    assert_eq!(timer.current_time(), 0.0);
}

#[test]
fn countdown_never_negative_across_many_ticks() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 1.0);
    for _ in 0..10 {
        ctx.dispatch_frame(0.3);
        assert!(timer.current_time() >= 0.0);
    }
    assert!(timer.is_finished());
}

#[test]
fn countdown_started_with_nothing_left_finishes_on_first_tick() {
    let ctx = TickContext::default();
    let timer = CountdownTimer::new(ctx.frame(), 10.0).unwrap();
    let stops = counter();
    timer.on_timer_stop(bump(&stops));

    assert!(timer.start_with_remaining(0.0).unwrap());
    ctx.dispatch_frame(0.0);
    ctx.dispatch_frame(0.016);
    assert_eq!(stops.get(), 1);
    assert_eq!(timer.state(), TimerState::Finished);
}

#[test]
fn finished_countdown_requires_reset_before_restart() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 1.0);
    ctx.dispatch_frame(1.0);
    assert_eq!(timer.state(), TimerState::Finished);

    assert!(!timer.start());
    timer.reset();
    assert_eq!(timer.state(), TimerState::Idle);
    assert_eq!(timer.current_time(), 1.0);
    assert!(timer.start());
}

#[test]
fn paused_countdown_keeps_registration_and_time() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 10.0);
    ctx.dispatch_frame(2.0);

    assert!(timer.pause());
    assert!(!timer.pause());
    ctx.dispatch_frame(3.0);
    assert!((timer.current_time() - 8.0).abs() < 1e-9);
    assert_eq!(ctx.frame().len(), 1);
    assert!(timer.is_registered());

    assert!(timer.resume());
    ctx.dispatch_frame(3.0);
    assert!((timer.current_time() - 5.0).abs() < 1e-9);
}

#[test]
fn stop_deregisters_and_fires_once() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 10.0);
    let stops = counter();
    timer.on_timer_stop(bump(&stops));

    assert!(timer.stop());
    assert!(!timer.stop());
    assert_eq!(stops.get(), 1);
    assert_eq!(timer.state(), TimerState::Idle);
    assert!(ctx.frame().is_empty());
}

#[test]
fn stop_from_paused_is_allowed() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 10.0);
    timer.pause();
    assert!(timer.stop());
    assert!(ctx.frame().is_empty());
}

#[test]
fn reset_keeps_running_state() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 10.0);
    ctx.dispatch_frame(4.0);

    timer.reset();
    assert_eq!(timer.current_time(), 10.0);
    assert!(timer.is_running());

    timer.reset_with(20.0).unwrap();
    assert_eq!(timer.current_time(), 20.0);
    assert_eq!(timer.initial_time(), 20.0);
    assert!(timer.is_running());
    assert!(timer.reset_with(-2.0).is_err());
}

#[test]
fn dispose_deregisters_and_clears_listeners() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 1.0);
    let stops = counter();
    timer.on_timer_stop(bump(&stops));

    timer.dispose();
    assert_eq!(timer.listener_count(), 0);
    assert!(ctx.frame().is_empty());

    ctx.dispatch_frame(5.0);
    assert_eq!(stops.get(), 0);
}

#[test]
fn dropping_last_handle_releases_registry_slot() {
    let ctx = TickContext::default();
    {
        let _timer = started_countdown(&ctx, 10.0);
        assert_eq!(ctx.frame().len(), 1);
    }
    assert!(ctx.frame().is_empty());
}

#[test]
fn stop_callback_can_restart_the_same_timer() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 1.0);
    {
        let again = timer.clone();
        let mut restarted = false;
        timer.on_timer_stop(move || {
            if !restarted {
                restarted = true;
                again.reset();
                assert!(again.start());
            }
        });
    }

    ctx.dispatch_frame(1.0);
    assert!(timer.is_running());
    assert_eq!(timer.current_time(), 1.0);
    // Re-registered mid-pass, promoted when the pass ended
    assert_eq!(ctx.frame().len(), 1);
    assert_eq!(ctx.frame().pending_len(), 0);
}

#[test]
fn callback_starting_another_timer_defers_its_first_tick() {
    let ctx = TickContext::default();
    let first = started_countdown(&ctx, 1.0);
    let second = CountdownTimer::new(ctx.frame(), 5.0).unwrap();
    {
        let second = second.clone();
        first.on_timer_stop(move || {
            second.start();
        });
    }

    ctx.dispatch_frame(1.0);
    assert!(second.is_running());
    assert_eq!(second.current_time(), 5.0, "started mid-pass, not ticked yet");

    ctx.dispatch_frame(1.0);
    assert_eq!(second.current_time(), 4.0);
}

#[test]
fn fixed_cadence_timer_ignores_frame_dispatch() {
    let ctx = TickContext::new(0.5);
    let timer = CountdownTimer::new(ctx.fixed(), 2.0).unwrap();
    timer.start();
    ctx.dispatch_fixed();

    ctx.dispatch_frame(10.0);
    assert_eq!(timer.current_time(), 2.0);

    ctx.dispatch_fixed();
    assert_eq!(timer.current_time(), 1.5);
}

#[test]
fn invalid_delta_is_ignored() {
    let ctx = TickContext::default();
    let timer = started_countdown(&ctx, 2.0);
    ctx.dispatch_frame(-1.0);
    ctx.dispatch_frame(f64::NAN);
    assert_eq!(timer.current_time(), 2.0);
}

// ─── Stopwatch ─────────────────────────────────────────────────────────────

#[test]
fn stopwatch_accumulates_unbounded() {
    let ctx = TickContext::default();
    let watch = StopwatchTimer::new(ctx.frame());
    watch.start();
    ctx.dispatch_frame(0.0);

    for _ in 0..4 {
        ctx.dispatch_frame(100.0);
    }
    assert_eq!(watch.elapsed(), 400.0);
    assert!(!watch.is_finished());
    assert_eq!(watch.progress(), 0.0);

    watch.stop();
    assert!(!watch.is_finished());
    assert_eq!(watch.state(), TimerState::Idle);
}

#[test]
fn stopwatch_restart_measures_from_zero() {
    let ctx = TickContext::default();
    let watch = StopwatchTimer::new(ctx.frame());
    watch.start();
    ctx.dispatch_frame(0.0);
    ctx.dispatch_frame(3.0);
    watch.stop();

    watch.start();
    assert_eq!(watch.elapsed(), 0.0);
}

// ─── Frequency ─────────────────────────────────────────────────────────────

#[test]
fn frequency_rejects_zero_rate() {
    let ctx = TickContext::default();
    assert_eq!(
        FrequencyTimer::new(ctx.frame(), 0).unwrap_err(),
        TimerError::InvalidTickRate { ticks_per_second: 0 }
    );
}

#[test]
fn frequency_never_bursts() {
    let ctx = TickContext::default();
    let freq = FrequencyTimer::new(ctx.frame(), 1).unwrap();
    let pulses = counter();
    freq.on_tick(bump(&pulses));
    freq.start();
    ctx.dispatch_frame(0.0);

    ctx.dispatch_frame(2.5);
    assert!(pulses.get() <= 1);
    assert_eq!(freq.current_time(), 2.5);

    ctx.dispatch_frame(0.0);
    assert_eq!(pulses.get(), 1);
    assert!((freq.current_time() - 1.5).abs() < 1e-9);

    ctx.dispatch_frame(0.0);
    assert_eq!(pulses.get(), 2);
    assert!((freq.current_time() - 0.5).abs() < 1e-9);

    ctx.dispatch_frame(0.0);
    assert_eq!(pulses.get(), 2, "remainder below threshold accumulates instead");
}

#[test]
fn frequency_finished_mirrors_running() {
    let ctx = TickContext::default();
    let freq = FrequencyTimer::new(ctx.frame(), 4).unwrap();
    assert!(freq.is_finished());
    assert_eq!(freq.time_threshold(), 0.25);

    freq.start();
    assert!(!freq.is_finished());
    freq.pause();
    assert!(freq.is_finished());
    freq.resume();
    freq.stop();
    assert!(freq.is_finished());
}

#[test]
fn frequency_rate_change_resets_accumulator() {
    let ctx = TickContext::default();
    let freq = FrequencyTimer::new(ctx.frame(), 2).unwrap();
    freq.start();
    ctx.dispatch_frame(0.0);
    ctx.dispatch_frame(0.3);

    freq.reset_ticks_per_second(10).unwrap();
    assert_eq!(freq.ticks_per_second(), 10);
    assert_eq!(freq.current_time(), 0.0);
    assert!((freq.time_threshold() - 0.1).abs() < 1e-12);
    assert!(freq.reset_ticks_per_second(0).is_err());
}

#[test]
fn timers_can_share_one_registry() {
    let ctx = TickContext::default();
    let a = started_countdown(&ctx, 1.0);
    let b = started_countdown(&ctx, 3.0);
    let watch = StopwatchTimer::new(ctx.frame());
    watch.start();
    ctx.dispatch_frame(0.0);

    ctx.dispatch_frame(1.0);
    assert!(a.is_finished());
    assert_eq!(b.current_time(), 2.0);
    assert_eq!(watch.elapsed(), 1.0);
    assert_eq!(ctx.frame().len(), 2);
}
