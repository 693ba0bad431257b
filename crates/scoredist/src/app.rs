use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{DefaultTerminal, Frame, layout::Rect};

use scoredist_core::layout::PlotFrame;
use scoredist_core::model::{BucketId, SelectionContext};
use scoredist_core::{Dashboard, SelectionEvent, VisibilityState};

use crate::config::AppConfig;
use crate::source::DistributionSource;
use crate::ticker::{ThreadTicker, Tick};
use crate::ui::{self, StatusLine};
use crate::util::format::format_interval;
use crate::worker::{FetchRequest, FetchWorker};

/// How long to wait for terminal input before servicing ticks and fetches.
const POLL_INTERVAL: Duration = Duration::from_millis(30);
const INTERVAL_STEP_MS: u64 = 100;

/// User intent, decoupled from the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    TogglePlay,
    Step(i64),
    Reset,
    SeekLast,
    ToggleBucket(BucketId),
    ShowAll,
    HideAll,
    ToggleMode,
    CycleHover,
    Faster,
    Slower,
    CycleIndex(i64),
    CycleMetric,
    CycleRange,
    Retry,
    Quit,
}

pub fn action_for_key(key: KeyEvent) -> Option<AppAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(AppAction::Quit);
    }
    let action = match key.code {
        KeyCode::Char(' ') => AppAction::TogglePlay,
        KeyCode::Left => AppAction::Step(-1),
        KeyCode::Right => AppAction::Step(1),
        KeyCode::Home => AppAction::Reset,
        KeyCode::End => AppAction::SeekLast,
        KeyCode::Char(c @ '1'..='5') => {
            let index = c.to_digit(10)? as usize - 1;
            AppAction::ToggleBucket(BucketId::from_index(index)?)
        }
        KeyCode::Char('a') => AppAction::ShowAll,
        KeyCode::Char('n') => AppAction::HideAll,
        KeyCode::Char('m') => AppAction::ToggleMode,
        KeyCode::Char('M') => AppAction::CycleMetric,
        KeyCode::Char('h') => AppAction::CycleHover,
        KeyCode::Char('+') | KeyCode::Char('=') => AppAction::Faster,
        KeyCode::Char('-') => AppAction::Slower,
        KeyCode::Char('[') => AppAction::CycleIndex(-1),
        KeyCode::Char(']') => AppAction::CycleIndex(1),
        KeyCode::Char('t') => AppAction::CycleRange,
        KeyCode::Char('r') => AppAction::Retry,
        KeyCode::Char('q') => AppAction::Quit,
        _ => return None,
    };
    Some(action)
}

pub struct App {
    dashboard: Dashboard<ThreadTicker>,
    ticks: Receiver<Tick>,
    worker: FetchWorker,
    config: AppConfig,
    plot: PlotFrame,
    source: String,
    /// Where the chart was last drawn, for mouse scrubbing.
    chart_area: Rect,
    notice: Option<String>,
    exit: bool,
}

impl App {
    pub fn new(config: AppConfig, source: Box<dyn DistributionSource>) -> Self {
        let (ticker, ticks) = ThreadTicker::new();
        let description = source.describe();
        Self {
            dashboard: Dashboard::new(config.initial_selection(), ticker, config.tick_interval_ms),
            ticks,
            worker: FetchWorker::new(source),
            plot: config.plot_frame(),
            config,
            source: description,
            chart_area: Rect::default(),
            notice: None,
            exit: false,
        }
    }

    pub fn dashboard(&self) -> &Dashboard<ThreadTicker> {
        &self.dashboard
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    fn today() -> jiff::civil::Date {
        jiff::Zoned::now().date()
    }

    /// Runs the application's main loop until the user quits
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.request(self.dashboard.context().clone());

        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
            self.drain_fetches();
            self.drain_ticks();
        }

        tracing::info!("event loop finished");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let status = self.status_line();
        self.chart_area = ui::draw(frame, &self.dashboard, &self.plot, &status);
    }

    fn status_line(&self) -> StatusLine {
        let playback = self.dashboard.playback();
        StatusLine {
            date: self.dashboard.current_date().map(|d| d.to_string()),
            position: self
                .dashboard
                .current_index()
                .map(|i| (i, self.dashboard.series().len())),
            playing: playback.is_playing(),
            interval: format_interval(playback.tick_interval_ms),
            source: self.source.clone(),
            notice: self.notice.clone(),
        }
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(action) = action_for_key(key) {
                    self.apply(action);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) {
            return;
        }
        if let Some(x) = canvas_x(self.chart_area, &self.plot, mouse.column, mouse.row) {
            self.dashboard.scrub_to(&self.plot, x);
        }
    }

    /// Apply any fetch results. Stale ones are dropped by the session.
    pub fn drain_fetches(&mut self) {
        while let Some(response) = self.worker.try_recv() {
            self.dashboard.complete(response.ticket, response.result);
        }
    }

    fn drain_ticks(&mut self) {
        while let Ok(tick) = self.ticks.try_recv() {
            self.dashboard.on_tick(tick.generation);
        }
    }

    fn request(&mut self, context: SelectionContext) {
        let (ticket, query) = self.dashboard.request(context, Self::today());
        self.send(FetchRequest { ticket, query });
    }

    fn send(&mut self, request: FetchRequest) {
        if self.worker.send(request) {
            self.notice = None;
        } else {
            tracing::error!("fetch worker is gone");
            self.notice = Some("fetch worker stopped; restart to reload".to_string());
        }
    }

    pub fn apply(&mut self, action: AppAction) {
        let interval = self.dashboard.playback().tick_interval_ms;
        match action {
            AppAction::TogglePlay => {
                self.dashboard.toggle_play();
            }
            AppAction::Step(delta) => {
                self.dashboard.step(delta);
            }
            AppAction::Reset => {
                self.dashboard.reset();
            }
            AppAction::SeekLast => {
                self.dashboard.seek_last();
            }
            AppAction::ToggleBucket(bucket) => self.dashboard.toggle_bucket(bucket),
            AppAction::ShowAll => self.dashboard.toggle_all(true),
            AppAction::HideAll => self.dashboard.toggle_all(false),
            AppAction::ToggleMode => {
                let mode = self.dashboard.view().mode.toggled();
                self.dashboard.set_display_mode(mode);
            }
            AppAction::CycleHover => {
                let next = VisibilityState::next_hover(self.dashboard.view().hovered);
                self.dashboard.select(SelectionEvent::SetHovered(next));
            }
            AppAction::Faster => {
                self.dashboard
                    .set_tick_interval(interval.saturating_sub(INTERVAL_STEP_MS));
            }
            AppAction::Slower => {
                self.dashboard
                    .set_tick_interval(interval.saturating_add(INTERVAL_STEP_MS));
            }
            AppAction::CycleIndex(delta) => {
                let mut context = self.dashboard.context().clone();
                context.index = cycle(&self.config.indices, &context.index, delta);
                self.request(context);
            }
            AppAction::CycleMetric => {
                let mut context = self.dashboard.context().clone();
                context.metric = cycle(&self.config.metrics, &context.metric, 1);
                self.request(context);
            }
            AppAction::CycleRange => {
                let mut context = self.dashboard.context().clone();
                context.range = context.range.next();
                self.request(context);
            }
            AppAction::Retry => {
                let (ticket, query) = self.dashboard.retry(Self::today());
                self.send(FetchRequest { ticket, query });
            }
            AppAction::Quit => self.exit = true,
        }
    }
}

/// Neighbour of `current` in `list`, wrapping. Unknown values start from the front.
fn cycle(list: &[String], current: &str, delta: i64) -> String {
    if list.is_empty() {
        return current.to_string();
    }
    let Some(position) = list.iter().position(|v| v == current) else {
        let fallback = if delta < 0 { list.last() } else { list.first() };
        return fallback.cloned().unwrap_or_default();
    };
    let next = (position as i64 + delta).rem_euclid(list.len() as i64) as usize;
    list[next].clone()
}

/// Canvas x under a terminal cell inside the chart's border, if any.
fn canvas_x(chart_area: Rect, plot: &PlotFrame, column: u16, row: u16) -> Option<f64> {
    let inner = Rect {
        x: chart_area.x.saturating_add(1),
        y: chart_area.y.saturating_add(1),
        width: chart_area.width.saturating_sub(2),
        height: chart_area.height.saturating_sub(2),
    };
    if inner.width == 0 || !inner.contains((column, row).into()) {
        return None;
    }
    let t = (f64::from(column - inner.x) + 0.5) / f64::from(inner.width);
    Some(t * plot.canvas.width)
}
