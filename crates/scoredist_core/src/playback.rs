//! Playback over the series' time index.
//!
//! [`PlaybackState::apply`] is the pure transition function. The
//! [`PlaybackController`] wraps it, owns the [`Scheduler`] exclusively and
//! stamps every timer run with a generation number. Any transition out of
//! `Playing` bumps the generation before the scheduler is told to stop, so
//! a tick that was already queued arrives with a stale generation and is
//! dropped without touching the index.

/// Default delay between animation ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;
pub const MIN_TICK_INTERVAL_MS: u64 = 50;
pub const MAX_TICK_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    Play,
    Pause,
    TogglePlay,
    Tick,
    /// Absolute seek; out-of-range targets are clamped.
    Seek(i64),
    /// Relative seek from the current index.
    Step(i64),
    SeekLast,
    Reset,
    SetInterval(u64),
    /// The series was replaced; the new length is passed to `apply`.
    SeriesReplaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub status: PlaybackStatus,
    pub tick_interval_ms: u64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            status: PlaybackStatus::Stopped,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl PlaybackState {
    #[must_use]
    pub fn with_interval(tick_interval_ms: u64) -> Self {
        Self {
            tick_interval_ms: clamp_interval(tick_interval_ms),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Next state for `event` over a series of `len` snapshots.
    #[must_use]
    pub fn apply(self, event: PlaybackEvent, len: usize) -> Self {
        let last = len.saturating_sub(1);
        match event {
            PlaybackEvent::Play => {
                if len == 0 {
                    return self;
                }
                let current_index = if self.current_index >= last {
                    0
                } else {
                    self.current_index
                };
                Self {
                    current_index,
                    status: PlaybackStatus::Playing,
                    ..self
                }
            }
            PlaybackEvent::Pause => self.stopped_at(self.current_index.min(last)),
            PlaybackEvent::TogglePlay => {
                if self.is_playing() {
                    self.apply(PlaybackEvent::Pause, len)
                } else {
                    self.apply(PlaybackEvent::Play, len)
                }
            }
            PlaybackEvent::Tick => {
                if !self.is_playing() || len == 0 {
                    return self;
                }
                let next = self.current_index + 1;
                if next >= last {
                    self.stopped_at(last)
                } else {
                    Self {
                        current_index: next,
                        ..self
                    }
                }
            }
            PlaybackEvent::Seek(target) => self.stopped_at(clamp_index(target, len)),
            PlaybackEvent::Step(delta) => {
                let target = i64::try_from(self.current_index)
                    .unwrap_or(i64::MAX)
                    .saturating_add(delta);
                self.stopped_at(clamp_index(target, len))
            }
            PlaybackEvent::SeekLast => self.stopped_at(last),
            PlaybackEvent::Reset => self.stopped_at(0),
            PlaybackEvent::SetInterval(ms) => Self {
                tick_interval_ms: clamp_interval(ms),
                ..self
            },
            PlaybackEvent::SeriesReplaced => self.stopped_at(self.current_index.min(last)),
        }
    }

    fn stopped_at(self, current_index: usize) -> Self {
        Self {
            current_index,
            status: PlaybackStatus::Stopped,
            ..self
        }
    }
}

fn clamp_index(target: i64, len: usize) -> usize {
    if target <= 0 || len == 0 {
        return 0;
    }
    usize::try_from(target).unwrap_or(usize::MAX).min(len - 1)
}

fn clamp_interval(ms: u64) -> u64 {
    ms.clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS)
}

/// Recurring timer driving playback.
///
/// Implementations deliver ticks back to the owner tagged with the
/// `generation` passed to [`Scheduler::start`]. `set_interval` applies to
/// the next wait, never to one already in progress.
pub trait Scheduler {
    fn start(&mut self, interval_ms: u64, generation: u64);
    fn stop(&mut self);
    fn set_interval(&mut self, interval_ms: u64);
}

/// Scheduler that never fires on its own; the caller delivers ticks.
///
/// Useful for headless use and tests: it records what the controller asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    pub running: Option<(u64, u64)>,
    pub starts: usize,
    pub stops: usize,
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, interval_ms: u64, generation: u64) {
        self.running = Some((interval_ms, generation));
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = None;
        self.stops += 1;
    }

    fn set_interval(&mut self, interval_ms: u64) {
        if let Some((interval, _)) = self.running.as_mut() {
            *interval = interval_ms;
        }
    }
}

/// Owns playback state and its scheduler.
#[derive(Debug)]
pub struct PlaybackController<S: Scheduler> {
    state: PlaybackState,
    generation: u64,
    scheduler: S,
}

impl<S: Scheduler> PlaybackController<S> {
    pub fn new(scheduler: S, tick_interval_ms: u64) -> Self {
        Self {
            state: PlaybackState::with_interval(tick_interval_ms),
            generation: 0,
            scheduler,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Generation of the current (or most recent) timer run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn dispatch(&mut self, event: PlaybackEvent, len: usize) -> PlaybackState {
        let before = self.state;
        let after = before.apply(event, len);

        match (before.is_playing(), after.is_playing()) {
            (false, true) => {
                self.generation += 1;
                self.state = after;
                self.scheduler.start(after.tick_interval_ms, self.generation);
            }
            (true, false) => {
                self.generation += 1;
                self.state = after;
                self.scheduler.stop();
            }
            (true, true) if before.tick_interval_ms != after.tick_interval_ms => {
                self.state = after;
                self.scheduler.set_interval(after.tick_interval_ms);
            }
            _ => self.state = after,
        }

        if before != after {
            tracing::debug!(?event, from = ?before, to = ?after, "playback transition");
        }
        after
    }

    /// Deliver a tick from the scheduler. Returns whether it was applied.
    pub fn on_tick(&mut self, generation: u64, len: usize) -> bool {
        if generation != self.generation || !self.state.is_playing() {
            tracing::trace!(
                generation,
                current = self.generation,
                "dropping stale playback tick"
            );
            return false;
        }
        self.dispatch(PlaybackEvent::Tick, len);
        true
    }
}

impl<S: Scheduler> Drop for PlaybackController<S> {
    fn drop(&mut self) {
        if self.state.is_playing() {
            self.scheduler.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_on_empty_series_is_noop() {
        let state = PlaybackState::default().apply(PlaybackEvent::Play, 0);
        assert_eq!(state, PlaybackState::default());
    }

    #[test]
    fn test_play_from_last_index_restarts() {
        let state = PlaybackState {
            current_index: 4,
            ..PlaybackState::default()
        }
        .apply(PlaybackEvent::Play, 5);
        assert_eq!(state.current_index, 0);
        assert!(state.is_playing());
    }

    #[test]
    fn test_tick_ignored_while_stopped() {
        let state = PlaybackState::default().apply(PlaybackEvent::Tick, 10);
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn test_step_clamps() {
        let state = PlaybackState::default()
            .apply(PlaybackEvent::Step(-1), 10)
            .apply(PlaybackEvent::Step(3), 10);
        assert_eq!(state.current_index, 3);
        let state = state.apply(PlaybackEvent::Step(100), 10);
        assert_eq!(state.current_index, 9);
    }

    #[test]
    fn test_interval_clamped() {
        let state = PlaybackState::default().apply(PlaybackEvent::SetInterval(1), 3);
        assert_eq!(state.tick_interval_ms, MIN_TICK_INTERVAL_MS);
        let state = state.apply(PlaybackEvent::SetInterval(u64::MAX), 3);
        assert_eq!(state.tick_interval_ms, MAX_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_series_replaced_stops_and_clamps() {
        let state = PlaybackState {
            current_index: 8,
            status: PlaybackStatus::Playing,
            ..PlaybackState::default()
        }
        .apply(PlaybackEvent::SeriesReplaced, 4);
        assert_eq!(state.current_index, 3);
        assert_eq!(state.status, PlaybackStatus::Stopped);
    }

    #[test]
    fn test_controller_starts_and_stops_scheduler() {
        let mut controller = PlaybackController::new(ManualScheduler::default(), 200);
        controller.dispatch(PlaybackEvent::Play, 5);
        assert_eq!(controller.scheduler().running, Some((200, 1)));

        controller.dispatch(PlaybackEvent::Pause, 5);
        assert_eq!(controller.scheduler().running, None);
        assert_eq!(controller.scheduler().stops, 1);
        assert_eq!(controller.generation(), 2);
    }

    #[test]
    fn test_interval_change_while_playing_reaches_scheduler() {
        let mut controller = PlaybackController::new(ManualScheduler::default(), 200);
        controller.dispatch(PlaybackEvent::Play, 5);
        controller.dispatch(PlaybackEvent::SetInterval(800), 5);
        assert_eq!(controller.scheduler().running, Some((800, 1)));
        assert_eq!(controller.scheduler().starts, 1);
        assert!(controller.state().is_playing());
    }
}
