//! Tests for timer-driven playback
//!
//! These tests verify:
//! - Auto-stop at the last index without overshoot
//! - Seek clamping and seek-stops-playback
//! - Stale ticks after pause/seek never move the index

use crate::playback::{ManualScheduler, PlaybackController, PlaybackEvent, PlaybackStatus};

const LEN: usize = 10;

fn controller() -> PlaybackController<ManualScheduler> {
    PlaybackController::new(ManualScheduler::default(), 500)
}

fn running_generation(controller: &PlaybackController<ManualScheduler>) -> u64 {
    controller.scheduler().running.map(|(_, g)| g).unwrap()
}

#[test]
fn test_nine_ticks_stop_at_last_index() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Play, LEN);
    let generation = running_generation(&controller);

    for _ in 0..9 {
        assert!(controller.on_tick(generation, LEN));
    }
    assert_eq!(controller.state().current_index, 9);
    assert_eq!(controller.state().status, PlaybackStatus::Stopped);
    assert!(controller.scheduler().running.is_none());

    // Further ticks from the finished run do nothing.
    assert!(!controller.on_tick(generation, LEN));
    assert_eq!(controller.state().current_index, 9);
}

#[test]
fn test_seek_clamps_and_stops() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Play, LEN);
    let state = controller.dispatch(PlaybackEvent::Seek(-5), LEN);
    assert_eq!(state.current_index, 0);
    assert_eq!(state.status, PlaybackStatus::Stopped);

    controller.dispatch(PlaybackEvent::Play, LEN);
    let state = controller.dispatch(PlaybackEvent::Seek(999), LEN);
    assert_eq!(state.current_index, 9);
    assert_eq!(state.status, PlaybackStatus::Stopped);
    assert_eq!(controller.scheduler().stops, 2);
}

#[test]
fn test_stale_tick_after_pause_is_noop() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Play, LEN);
    let generation = running_generation(&controller);
    controller.on_tick(generation, LEN);
    controller.dispatch(PlaybackEvent::Pause, LEN);

    assert!(!controller.on_tick(generation, LEN));
    assert_eq!(controller.state().current_index, 1);
}

#[test]
fn test_tick_from_previous_run_ignored_after_restart() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Play, LEN);
    let first = running_generation(&controller);
    controller.dispatch(PlaybackEvent::Seek(4), LEN);
    controller.dispatch(PlaybackEvent::Play, LEN);
    let second = running_generation(&controller);
    assert_ne!(first, second);

    assert!(!controller.on_tick(first, LEN));
    assert_eq!(controller.state().current_index, 4);
    assert!(controller.on_tick(second, LEN));
    assert_eq!(controller.state().current_index, 5);
}

#[test]
fn test_reset_from_playing() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Seek(6), LEN);
    controller.dispatch(PlaybackEvent::Play, LEN);
    let state = controller.dispatch(PlaybackEvent::Reset, LEN);
    assert_eq!(state.current_index, 0);
    assert!(!state.is_playing());
}

#[test]
fn test_play_on_empty_series_does_not_start_timer() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Play, 0);
    assert_eq!(controller.scheduler().starts, 0);
    assert!(!controller.state().is_playing());
}

#[test]
fn test_two_point_series_stops_after_one_tick() {
    let mut controller = controller();
    controller.dispatch(PlaybackEvent::Play, 2);
    let generation = running_generation(&controller);
    controller.on_tick(generation, 2);
    assert_eq!(controller.state().current_index, 1);
    assert!(!controller.state().is_playing());
}
