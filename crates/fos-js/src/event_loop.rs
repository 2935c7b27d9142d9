//! Event Loop Implementation
//!
//! Drives a host's [`TaskScheduler`]. One drain pass fires every timer that
//! was due when the pass began, in `(fire_at, id)` order. Each callback is
//! lent out of the scheduler while it runs, so it receives `&mut H` and may
//! schedule, cancel or mutate the DOM freely.

use crate::timers::{CallbackError, TaskScheduler, TimerId};

/// Pass cap used when the caller does not supply one
pub const DEFAULT_MAX_PASSES: usize = 10_000;

/// Something that owns a scheduler and runs its callbacks
pub trait SchedulerHost: Sized {
    fn scheduler(&self) -> &TaskScheduler<Self>;

    fn scheduler_mut(&mut self) -> &mut TaskScheduler<Self>;

    /// Error channel for callbacks that failed
    fn report_callback_failure(&mut self, timer: TimerId, error: CallbackError);
}

/// Counters for one or more drain passes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passes: usize,
    pub fired: usize,
    pub failed: usize,
    /// No timer left that could fire
    pub idle: bool,
}

impl RunReport {
    fn absorb(&mut self, pass: RunReport) {
        self.passes += pass.passes;
        self.fired += pass.fired;
        self.failed += pass.failed;
    }
}

/// Run one drain pass at the current virtual time
pub fn run_pass<H: SchedulerHost>(host: &mut H) -> RunReport {
    let due = host.scheduler_mut().begin_pass();
    let mut report = RunReport {
        passes: 1,
        ..RunReport::default()
    };

    for id in due {
        // Cancelled by an earlier callback of this pass
        let Some(mut callback) = host.scheduler_mut().take_due(id) else {
            continue;
        };

        tracing::trace!(timer = %id, now = host.scheduler().now(), "firing timer");
        let result = callback(host);
        host.scheduler_mut().finish(id, callback);
        report.fired += 1;

        if let Err(error) = result {
            report.failed += 1;
            host.report_callback_failure(id, error);
        }
    }

    host.scheduler_mut().end_pass();
    report.idle = !host.scheduler().has_pending();
    report
}

/// Fire whatever is due right now without moving the clock
pub fn run_due<H: SchedulerHost>(host: &mut H) -> RunReport {
    run_pass(host)
}

/// Move the clock forward by `ms`, stopping at every fire time on the way.
///
/// The clock ends at `now + ms` even when `max_passes` cut the run short;
/// timers left overdue fire on the next drive.
pub fn advance_by<H: SchedulerHost>(host: &mut H, ms: u64, max_passes: usize) -> RunReport {
    let target = host.scheduler().now().saturating_add(ms);
    let mut report = RunReport::default();

    while let Some(at) = host.scheduler().next_fire_time() {
        if at > target {
            break;
        }
        if report.passes >= max_passes {
            tracing::warn!(max_passes, target, "pass limit reached while advancing clock");
            break;
        }
        host.scheduler_mut().set_now(at);
        report.absorb(run_pass(host));
    }

    host.scheduler_mut().set_now(target);
    report.idle = !host.scheduler().has_pending();
    tracing::debug!(
        ms,
        passes = report.passes,
        fired = report.fired,
        failed = report.failed,
        "advanced clock"
    );
    report
}

/// Run passes until no timer is left or `max_passes` is reached.
///
/// A live interval never lets the loop go idle, so the cap is what ends a
/// run over one; `idle` tells the two cases apart.
pub fn run_until_idle<H: SchedulerHost>(host: &mut H, max_passes: usize) -> RunReport {
    let mut report = RunReport::default();

    while let Some(at) = host.scheduler().next_fire_time() {
        if report.passes >= max_passes {
            tracing::warn!(max_passes, "pass limit reached before the loop went idle");
            break;
        }
        host.scheduler_mut().set_now(at);
        report.absorb(run_pass(host));
    }

    report.idle = !host.scheduler().has_pending();
    report
}
