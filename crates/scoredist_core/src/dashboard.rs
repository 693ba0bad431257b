//! The full engine state behind one chart.
//!
//! [`Dashboard`] ties the loaded series, playback and view state together
//! and exposes the imperative operations a front end calls. Every view is
//! derived on demand from the current state.

use jiff::civil::Date;

use crate::breakdown::{BreakdownView, breakdown_view};
use crate::error::FetchError;
use crate::layout::{ChartLayout, PlotFrame, compute_layout};
use crate::model::{BucketId, DistributionSeries, SelectionContext};
use crate::playback::{PlaybackController, PlaybackEvent, PlaybackState, Scheduler};
use crate::ratio::{RatioPoint, RatioStats, derive_ratios, ratio_stats};
use crate::selection::{DisplayMode, SelectionEvent, VisibilityState};
use crate::session::{ApplyOutcome, LoadState, RequestTicket, Session};
use crate::wire::{DistributionQuery, DistributionResponse};

#[derive(Debug)]
pub struct Dashboard<S: Scheduler> {
    session: Session,
    playback: PlaybackController<S>,
    view: VisibilityState,
    /// Derived from the current series; rebuilt whenever it is replaced.
    ratios: Vec<RatioPoint>,
}

impl<S: Scheduler> Dashboard<S> {
    pub fn new(context: SelectionContext, scheduler: S, tick_interval_ms: u64) -> Self {
        Self {
            session: Session::new(context),
            playback: PlaybackController::new(scheduler, tick_interval_ms),
            view: VisibilityState::default(),
            ratios: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn series(&self) -> &DistributionSeries {
        self.session.series()
    }

    pub fn context(&self) -> &SelectionContext {
        self.session.context()
    }

    pub fn load_state(&self) -> &LoadState {
        self.session.state()
    }

    pub fn playback(&self) -> &PlaybackState {
        self.playback.state()
    }

    pub fn playback_generation(&self) -> u64 {
        self.playback.generation()
    }

    pub fn scheduler(&self) -> &S {
        self.playback.scheduler()
    }

    pub fn view(&self) -> &VisibilityState {
        &self.view
    }

    pub fn ratios(&self) -> &[RatioPoint] {
        &self.ratios
    }

    /// Current index, or `None` for an empty series.
    pub fn current_index(&self) -> Option<usize> {
        (!self.series().is_empty()).then_some(self.playback.state().current_index)
    }

    pub fn current_date(&self) -> Option<Date> {
        self.current_index()
            .and_then(|i| self.series().get(i))
            .map(|s| s.date)
    }

    pub fn layout(&self, frame: &PlotFrame) -> ChartLayout {
        compute_layout(self.series(), &self.view, frame, self.current_index())
    }

    pub fn ratio_stats(&self) -> RatioStats {
        ratio_stats(&self.ratios, self.playback.state().current_index)
    }

    /// Bucket whose constituents are listed: the hovered one, else the first visible.
    pub fn breakdown_bucket(&self) -> Option<BucketId> {
        self.view
            .hovered
            .or_else(|| self.view.visible_buckets().next())
    }

    pub fn breakdown(&self, bucket: BucketId) -> BreakdownView {
        breakdown_view(self.series(), self.playback.state().current_index, bucket)
    }

    // ------------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------------

    fn dispatch(&mut self, event: PlaybackEvent) -> PlaybackState {
        let len = self.series().len();
        self.playback.dispatch(event, len)
    }

    pub fn play(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::Play)
    }

    pub fn pause(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::Pause)
    }

    pub fn toggle_play(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::TogglePlay)
    }

    pub fn seek(&mut self, index: i64) -> PlaybackState {
        self.dispatch(PlaybackEvent::Seek(index))
    }

    pub fn step(&mut self, delta: i64) -> PlaybackState {
        self.dispatch(PlaybackEvent::Step(delta))
    }

    pub fn seek_last(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::SeekLast)
    }

    pub fn reset(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::Reset)
    }

    pub fn set_tick_interval(&mut self, interval_ms: u64) -> PlaybackState {
        self.dispatch(PlaybackEvent::SetInterval(interval_ms))
    }

    /// Deliver a scheduler tick. Stale generations are ignored.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        let len = self.series().len();
        self.playback.on_tick(generation, len)
    }

    /// Seek to the snapshot nearest canvas x.
    pub fn scrub_to(&mut self, frame: &PlotFrame, x: f64) -> Option<PlaybackState> {
        let index = frame.index_at_x(x, self.series().len())?;
        Some(self.seek(i64::try_from(index).unwrap_or(i64::MAX)))
    }

    // ------------------------------------------------------------------------
    // View state
    // ------------------------------------------------------------------------

    pub fn select(&mut self, event: SelectionEvent) {
        self.view = self.view.apply(event);
        tracing::debug!(?event, "view state updated");
    }

    pub fn toggle_bucket(&mut self, bucket: BucketId) {
        self.select(SelectionEvent::ToggleBucket(bucket));
    }

    pub fn toggle_all(&mut self, visible: bool) {
        self.select(SelectionEvent::ToggleAll(visible));
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.select(SelectionEvent::SetDisplayMode(mode));
    }

    pub fn set_hovered(&mut self, bucket: Option<BucketId>) {
        self.select(SelectionEvent::SetHovered(bucket));
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    pub fn request(&mut self, context: SelectionContext, today: Date) -> (RequestTicket, DistributionQuery) {
        self.session.begin_request(context, today)
    }

    pub fn retry(&mut self, today: Date) -> (RequestTicket, DistributionQuery) {
        self.session.retry(today)
    }

    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<DistributionResponse, FetchError>,
    ) -> ApplyOutcome {
        let outcome = self.session.complete(ticket, result);
        if outcome.replaced_series() {
            self.ratios = derive_ratios(self.series().snapshots());
            self.dispatch(PlaybackEvent::SeriesReplaced);
        }
        outcome
    }
}
