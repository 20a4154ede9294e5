use std::io::Write;

use chrono::{DateTime, Local};
use hourglass_core::{CountdownTimer, ScheduleConfig, ScheduleConfigExt};

use crate::CliContext;

fn out(line: impl std::fmt::Display) -> Result<(), String> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{line}").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())
}

/// Announce completion on stdout.
fn watch(key: &str, timer: &CountdownTimer) {
    let key = key.to_string();
    timer.on_timer_stop(move || {
        let _ = out(format_args!("\n{key} finished"));
    });
}

pub fn start(ctx: &mut CliContext, key: &str, secs: f64, tiers: i32) -> Result<(), String> {
    let already_active = ctx.schedule.is_loaded_pending(key)
        || ctx
            .schedule
            .get_countdown_timer(key)
            .is_some_and(|timer| timer.state().is_active());
    let timer = ctx
        .schedule
        .start_tiered_countdown_timer(key, secs, tiers)
        .map_err(|e| e.to_string())?;

    if already_active {
        return out(format_args!(
            "{key} already scheduled ({} left)",
            format_secs(timer.remaining())
        ));
    }
    watch(key, &timer);
    out(format_args!("started {key} for {}", format_secs(secs)))
}

pub fn resume(ctx: &mut CliContext, key: &str) -> Result<(), String> {
    let was_pending = ctx.schedule.is_loaded_pending(key);
    let timer = ctx
        .schedule
        .start_loaded_countdown_timer(key)
        .ok_or_else(|| format!("no saved countdown named {key}"))?;

    if was_pending {
        watch(key, &timer);
    }
    out(format_args!("resumed {key} with {} left", format_secs(timer.remaining())))
}

pub fn resume_all(ctx: &mut CliContext) -> Result<(), String> {
    let pending: Vec<String> = ctx
        .schedule
        .keys()
        .into_iter()
        .filter(|key| ctx.schedule.is_loaded_pending(key))
        .collect();

    if pending.is_empty() {
        return out("nothing to resume");
    }
    for key in pending {
        resume(ctx, &key)?;
    }
    Ok(())
}

pub fn remove(ctx: &mut CliContext, key: &str) -> Result<(), String> {
    if ctx.schedule.remove_countdown_timer(key) {
        out(format_args!("removed {key}"))
    } else {
        out(format_args!("no countdown named {key}"))
    }
}

pub fn pause(ctx: &CliContext, key: &str, paused: bool) -> Result<(), String> {
    let timer = ctx
        .schedule
        .get_countdown_timer(key)
        .ok_or_else(|| format!("no countdown named {key}"))?;

    let changed = if paused { timer.pause() } else { timer.resume() };
    if changed {
        out(format_args!("{key} {}", if paused { "paused" } else { "running" }))
    } else {
        out(format_args!("{key} is {:?}", timer.state()))
    }
}

pub fn set_tier(ctx: &mut CliContext, key: &str, tier: i32) -> Result<(), String> {
    ctx.schedule
        .set_countdown_tier(key, tier)
        .map_err(|e| e.to_string())?;
    out(format_args!("{key} now at tier {tier}"))
}

pub fn list(ctx: &CliContext) -> Result<(), String> {
    let keys = ctx.schedule.keys();
    if keys.is_empty() {
        return out("no countdowns");
    }

    for key in keys {
        let (Some(timer), Some(record)) = (
            ctx.schedule.get_countdown_timer(&key),
            ctx.schedule.countdown_record(&key),
        ) else {
            continue;
        };

        let state = if ctx.schedule.is_loaded_pending(&key) {
            "saved".to_string()
        } else {
            format!("{:?}", timer.state()).to_lowercase()
        };
        let ends = DateTime::from_timestamp(record.end_time_unix, 0)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let tier = if record.tier_count > 0 {
            format!("  tier {}/{}", record.current_tier, record.tier_count)
        } else {
            String::new()
        };

        out(format_args!(
            "{key:<20} {state:<8} {:>10}  {:>3.0}%  ends {ends}{tier}",
            format_secs(timer.remaining()),
            timer.progress() * 100.0,
        ))?;
    }
    Ok(())
}

pub fn show_config(ctx: &CliContext) -> Result<(), String> {
    let path = ScheduleConfig::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unavailable>".to_string());
    out(format_args!("config file: {path}"))?;
    out(format_args!("backend:     {}", ctx.config.backend.label()))?;
    out(format_args!("cadence:     {:?}", ctx.config.cadence))?;
    out(format_args!("frame rate:  {} Hz", ctx.config.frame_rate_hz))?;
    out(format_args!("fixed step:  {} Hz", ctx.config.fixed_step_hz))
}

pub fn exit() -> Result<(), String> {
    out("quitting...")
}

/// `h:mm:ss` for long durations, `m:ss.s` otherwise.
pub fn format_secs(secs: f64) -> String {
    let secs = secs.max(0.0);
    let whole = secs.floor() as u64;
    let (h, m, s) = (whole / 3600, (whole / 60) % 60, whole % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{:04.1}", secs - (whole - whole % 60) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::format_secs;

    #[test]
    fn formats_short_and_long_durations() {
        assert_eq!(format_secs(5.25), "0:05.2");
        assert_eq!(format_secs(75.0), "1:15.0");
        assert_eq!(format_secs(3_725.0), "1:02:05");
        assert_eq!(format_secs(-3.0), "0:00.0");
    }
}
