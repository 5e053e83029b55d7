//! Animated transitions between observer states.
//!
//! A [`TransitionScheduler`] is either idle, showing its settled state, or
//! animating from the settled state towards a target over a fixed duration.
//! The caller supplies monotonic clock readings; the scheduler never reads a
//! clock itself.
//!
//! Time does not interpolate linearly. The sky is rotated along the shortest
//! way round the clock face (at most twelve hours either direction) plus one
//! degree per calendar day, and the interpolated moment is derived from that
//! rotation. For a target on another calendar day the last frame therefore
//! shows a moment that differs from the target; the target itself is what gets
//! committed.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Timelike};
use ephemeris::time_system::{unix_millis, DEGREES_PER_HOUR};

use crate::observer::ObserverState;

/// Length of one transition
pub const TRANSITION_DURATION: Duration = Duration::from_millis(2000);

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: i64 = 86_400;
const HALF_DAY_SECONDS: i64 = SECONDS_PER_DAY / 2;

/// Sky rotation credited to each calendar day of difference
const DEGREES_PER_DAY: f64 = 1.0;

/// Quadratic ease-in-out on [0, 1].
pub fn ease_in_out_quad(progress: f64) -> f64 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

fn seconds_of_day(timestamp: &NaiveDateTime) -> i64 {
    i64::from(timestamp.num_seconds_from_midnight())
}

/// Angle in degrees the sky turns going from `from` to `to`.
///
/// The time-of-day part takes the shorter way round (a difference of more than
/// twelve hours is wrapped) at 15 degrees per hour; each calendar day between
/// the two dates adds one degree. Sub-second parts are ignored.
pub fn sky_angle_difference(from: &NaiveDateTime, to: &NaiveDateTime) -> f64 {
    let days = (to.date() - from.date()).num_days() as f64;

    let mut seconds = seconds_of_day(to) - seconds_of_day(from);
    if seconds.abs() > HALF_DAY_SECONDS {
        seconds = if seconds > 0 {
            seconds - SECONDS_PER_DAY
        } else {
            seconds + SECONDS_PER_DAY
        };
    }

    seconds as f64 / SECONDS_PER_HOUR * DEGREES_PER_HOUR + days * DEGREES_PER_DAY
}

/// Observer state at eased `progress` of the way from `previous` to `target`.
///
/// Latitude and longitude move linearly. The timestamp advances from
/// `previous` by the matching share of [`sky_angle_difference`], converted back
/// at 15 degrees per hour and truncated to whole milliseconds.
pub fn interpolate(previous: &ObserverState, target: &ObserverState, progress: f64) -> ObserverState {
    let latitude = previous.latitude_deg() + (target.latitude_deg() - previous.latitude_deg()) * progress;
    let longitude =
        previous.longitude_deg() + (target.longitude_deg() - previous.longitude_deg()) * progress;

    let angle = sky_angle_difference(&previous.timestamp(), &target.timestamp()) * progress;
    let adjustment_ms = angle / DEGREES_PER_HOUR * SECONDS_PER_HOUR * 1000.0;
    let moment_ms = (unix_millis(&previous.timestamp()) as f64 + adjustment_ms).trunc() as i64;
    let timestamp = DateTime::from_timestamp_millis(moment_ms)
        .map(|moment| moment.naive_utc())
        .unwrap_or_else(|| previous.timestamp());

    ObserverState::interpolated(latitude, longitude, timestamp)
}

/// One in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub previous: ObserverState,
    pub target: ObserverState,
    /// Clock reading when the transition was requested
    pub start: Duration,
    pub duration: Duration,
}

impl TransitionState {
    /// Linear progress in [0, 1] at clock reading `now`
    pub fn raw_progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Scheduler phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    /// Showing the settled state
    Idle,
    Animating(TransitionState),
}

/// What a call to [`TransitionScheduler::request`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Same as the current target, nothing to do
    Unchanged,
    /// A transition started from idle
    Started,
    /// The in-flight transition was replaced by one towards the new target
    Superseded,
    /// The request matched the settled state; the in-flight transition was dropped
    Reverted,
}

/// Observer state to draw for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub observer: ObserverState,
    /// Eased progress in [0, 1]
    pub progress: f64,
    /// True on the last frame of a transition and on every idle frame
    pub finished: bool,
}

/// Drives transitions between observer states.
#[derive(Debug, Clone)]
pub struct TransitionScheduler {
    settled: ObserverState,
    phase: TransitionPhase,
    duration: Duration,
}

impl TransitionScheduler {
    pub fn new(initial: ObserverState) -> Self {
        Self::with_duration(initial, TRANSITION_DURATION)
    }

    pub fn with_duration(initial: ObserverState, duration: Duration) -> Self {
        Self {
            settled: initial,
            phase: TransitionPhase::Idle,
            duration,
        }
    }

    /// State last committed by a finished transition.
    pub fn settled(&self) -> &ObserverState {
        &self.settled
    }

    /// Where the scheduler is heading: the transition target, or the settled state when idle.
    pub fn target(&self) -> &ObserverState {
        match &self.phase {
            TransitionPhase::Idle => &self.settled,
            TransitionPhase::Animating(transition) => &transition.target,
        }
    }

    pub fn phase(&self) -> &TransitionPhase {
        &self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, TransitionPhase::Animating(_))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Ask for a new target at clock reading `now`.
    ///
    /// A superseding transition restarts from the settled state, not from the
    /// point the previous transition had reached.
    pub fn request(&mut self, target: ObserverState, now: Duration) -> RequestOutcome {
        if target.same_target(self.target()) {
            return RequestOutcome::Unchanged;
        }

        let animating = self.is_animating();
        if animating && target.same_target(&self.settled) {
            log::info!("Transition cancelled, back to settled state");
            self.phase = TransitionPhase::Idle;
            return RequestOutcome::Reverted;
        }

        self.phase = TransitionPhase::Animating(TransitionState {
            previous: self.settled,
            target,
            start: now,
            duration: self.duration,
        });

        if animating {
            log::info!(
                "Transition superseded, restarting from settled state towards ({:.4}, {:.4}) at {}",
                target.latitude_deg(),
                target.longitude_deg(),
                target.timestamp()
            );
            RequestOutcome::Superseded
        } else {
            log::info!(
                "Transition started towards ({:.4}, {:.4}) at {}",
                target.latitude_deg(),
                target.longitude_deg(),
                target.timestamp()
            );
            RequestOutcome::Started
        }
    }

    /// Observer state to draw at clock reading `now`.
    ///
    /// Once the duration has elapsed the target is committed as the settled
    /// state and the scheduler returns to idle.
    pub fn frame(&mut self, now: Duration) -> Frame {
        let transition = match self.phase {
            TransitionPhase::Idle => {
                return Frame {
                    observer: self.settled,
                    progress: 1.0,
                    finished: true,
                }
            }
            TransitionPhase::Animating(transition) => transition,
        };

        let raw = transition.raw_progress(now);
        let progress = ease_in_out_quad(raw);
        let observer = interpolate(&transition.previous, &transition.target, progress);
        let finished = raw >= 1.0;
        log::debug!("Transition frame at raw progress {raw:.3}, eased {progress:.3}");

        if finished {
            self.settled = transition.target;
            self.phase = TransitionPhase::Idle;
            log::info!("Transition complete");
        }

        Frame {
            observer,
            progress,
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn ts(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn observer(lat: f64, lon: f64, timestamp: NaiveDateTime) -> ObserverState {
        ObserverState::new(lat, lon, timestamp).unwrap()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.25, 0.125)]
    #[case(0.5, 0.5)]
    #[case(0.75, 0.875)]
    #[case(1.0, 1.0)]
    fn test_ease_in_out_quad(#[case] p: f64, #[case] expected: f64) {
        assert_relative_eq!(ease_in_out_quad(p), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut previous = -1.0;
        for i in 0..=100 {
            let eased = ease_in_out_quad(i as f64 / 100.0);
            assert!(eased >= previous);
            previous = eased;
        }
    }

    #[rstest]
    #[case(ts(1, 20, 0, 0), ts(1, 22, 0, 0), 30.0)]
    #[case(ts(1, 22, 0, 0), ts(1, 20, 0, 0), -30.0)]
    // 23:00 -> 01:00 next day goes forward two hours, plus one day
    #[case(ts(1, 23, 0, 0), ts(2, 1, 0, 0), 31.0)]
    // 01:00 -> 23:00 same day goes back two hours
    #[case(ts(1, 1, 0, 0), ts(1, 23, 0, 0), -30.0)]
    // Exactly twelve hours is not wrapped
    #[case(ts(1, 6, 0, 0), ts(1, 18, 0, 0), 180.0)]
    #[case(ts(1, 21, 30, 0), ts(4, 21, 30, 0), 3.0)]
    fn test_sky_angle_difference(
        #[case] from: NaiveDateTime,
        #[case] to: NaiveDateTime,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(sky_angle_difference(&from, &to), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_endpoints_same_day() {
        let a = observer(31.23, 121.47, ts(1, 20, 0, 0));
        let b = observer(40.71, -74.0, ts(1, 23, 30, 0));

        let start = interpolate(&a, &b, 0.0);
        assert_eq!(start, a);

        let end = interpolate(&a, &b, 1.0);
        assert_relative_eq!(end.latitude_deg(), 40.71, epsilon = 1e-12);
        assert_relative_eq!(end.longitude_deg(), -74.0, epsilon = 1e-12);
        assert_eq!(end.timestamp(), b.timestamp());
    }

    #[test]
    fn test_interpolate_halfway() {
        let a = observer(0.0, 0.0, ts(1, 20, 0, 0));
        let b = observer(10.0, 20.0, ts(1, 22, 0, 0));
        let mid = interpolate(&a, &b, 0.5);
        assert_relative_eq!(mid.latitude_deg(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(mid.longitude_deg(), 10.0, epsilon = 1e-12);
        assert_eq!(mid.timestamp(), ts(1, 21, 0, 0));
    }

    #[test]
    fn test_interpolate_across_days_lands_on_rotation_not_date() {
        // Three days later at the same wall-clock time is a 3 degree rotation,
        // which is 12 minutes of sidereal-ish time.
        let a = observer(0.0, 0.0, ts(1, 21, 30, 0));
        let b = observer(0.0, 0.0, ts(4, 21, 30, 0));
        let end = interpolate(&a, &b, 1.0);
        assert_eq!(end.timestamp(), ts(1, 21, 42, 0));
    }

    #[test]
    fn test_interpolate_truncates_toward_earlier_millisecond() {
        let a = observer(0.0, 0.0, ts(1, 12, 0, 0));
        let b = observer(0.0, 0.0, ts(1, 11, 59, 59));
        // -1 s * 0.0015 = -1.5 ms, floored on the absolute timeline
        let moment = interpolate(&a, &b, 0.0015).timestamp();
        let expected = ts(1, 12, 0, 0) - chrono::Duration::milliseconds(2);
        assert_eq!(moment, expected);
    }

    #[test]
    fn test_idle_frame_is_settled_state() {
        let a = observer(10.0, 20.0, ts(1, 20, 0, 0));
        let mut scheduler = TransitionScheduler::new(a);
        let frame = scheduler.frame(ms(5000));
        assert_eq!(frame.observer, a);
        assert!(frame.finished);
        assert!(!scheduler.is_animating());
    }

    #[test]
    fn test_request_equal_to_target_is_noop() {
        let a = observer(10.0, 20.0, ts(1, 20, 0, 0));
        let mut scheduler = TransitionScheduler::new(a);
        assert_eq!(scheduler.request(a, ms(0)), RequestOutcome::Unchanged);

        // Sub-second differences do not count as a change
        let nudged = a.at(a.timestamp() + chrono::Duration::milliseconds(400));
        assert_eq!(scheduler.request(nudged, ms(0)), RequestOutcome::Unchanged);
        assert!(!scheduler.is_animating());
    }

    #[test]
    fn test_transition_converges_to_target() {
        let a = observer(31.23, 121.47, ts(1, 20, 0, 0));
        let b = observer(51.5, -0.12, ts(2, 2, 15, 0));
        let mut scheduler = TransitionScheduler::new(a);
        assert_eq!(scheduler.request(b, ms(1000)), RequestOutcome::Started);

        let mut previous_progress = -1.0;
        let mut now = 1000;
        loop {
            now += 16;
            let frame = scheduler.frame(ms(now));
            assert!(frame.progress >= previous_progress);
            previous_progress = frame.progress;
            if frame.finished {
                break;
            }
        }
        assert!(now >= 3000);
        assert_eq!(*scheduler.settled(), b);
        assert!(!scheduler.is_animating());
    }

    #[test]
    fn test_progress_at_start_and_midpoint() {
        let a = observer(0.0, 0.0, ts(1, 20, 0, 0));
        let b = observer(20.0, 0.0, ts(1, 20, 0, 0));
        let mut scheduler = TransitionScheduler::new(a);
        scheduler.request(b, ms(100));

        let first = scheduler.frame(ms(100));
        assert_eq!(first.progress, 0.0);
        assert_eq!(first.observer, a);

        let mid = scheduler.frame(ms(1100));
        assert_relative_eq!(mid.progress, 0.5, epsilon = 1e-12);
        assert_relative_eq!(mid.observer.latitude_deg(), 10.0, epsilon = 1e-12);
        assert!(!mid.finished);
    }

    #[test]
    fn test_supersede_restarts_from_settled_state() {
        let a = observer(0.0, 0.0, ts(1, 20, 0, 0));
        let b = observer(40.0, 0.0, ts(1, 20, 0, 0));
        let c = observer(-40.0, 0.0, ts(1, 20, 0, 0));
        let mut scheduler = TransitionScheduler::new(a);
        scheduler.request(b, ms(0));
        scheduler.frame(ms(1500));

        assert_eq!(scheduler.request(c, ms(1500)), RequestOutcome::Superseded);
        let restart = scheduler.frame(ms(1500));
        assert_eq!(restart.observer, a);
        assert_eq!(*scheduler.target(), c);

        let done = scheduler.frame(ms(3500));
        assert!(done.finished);
        assert_eq!(*scheduler.settled(), c);
    }

    #[test]
    fn test_request_back_to_settled_cancels_transition() {
        let a = observer(0.0, 0.0, ts(1, 20, 0, 0));
        let b = observer(40.0, 0.0, ts(1, 20, 0, 0));
        let mut scheduler = TransitionScheduler::new(a);
        scheduler.request(b, ms(0));
        assert_eq!(scheduler.request(a, ms(500)), RequestOutcome::Reverted);
        assert!(!scheduler.is_animating());
        assert_eq!(*scheduler.settled(), a);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_frame() {
        let a = observer(0.0, 0.0, ts(1, 20, 0, 0));
        let b = observer(1.0, 0.0, ts(1, 20, 0, 0));
        let mut scheduler = TransitionScheduler::with_duration(a, Duration::ZERO);
        scheduler.request(b, ms(0));
        let frame = scheduler.frame(ms(0));
        assert!(frame.finished);
        assert_eq!(*scheduler.settled(), b);
    }
}
