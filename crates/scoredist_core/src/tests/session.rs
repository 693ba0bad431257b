//! Tests for last-request-wins loading
//!
//! These tests verify:
//! - A late response for a superseded selection is discarded
//! - Replacement resets playback bounds
//! - Retry after failure reloads the same selection

use crate::dashboard::Dashboard;
use crate::error::FetchError;
use crate::model::{SelectionContext, TimeRange};
use crate::playback::ManualScheduler;
use crate::session::{ApplyOutcome, LoadState};
use crate::wire::{DistributionResponse, decode_response};

fn today() -> jiff::civil::Date {
    jiff::civil::date(2024, 6, 30)
}

fn response(base_symbol: &str, days: usize) -> DistributionResponse {
    let data: Vec<String> = (1..=days)
        .map(|d| {
            format!(r#"{{"date": "2024-05-{d:02}", "distribution": {{"40-60": {{"count": 2}}}}, "total_symbols": 2}}"#)
        })
        .collect();
    decode_response(&format!(
        r#"{{"data": [{}], "base_symbol": "{base_symbol}"}}"#,
        data.join(",")
    ))
    .unwrap()
}

fn dashboard() -> Dashboard<ManualScheduler> {
    Dashboard::new(SelectionContext::default(), ManualScheduler::default(), 500)
}

#[test]
fn test_late_response_for_old_selection_is_discarded() {
    let mut dashboard = dashboard();
    let a = SelectionContext::new("SPX", "momentum", TimeRange::OneYear);
    let b = SelectionContext::new("NDX", "momentum", TimeRange::OneYear);

    let (ticket_a, query_a) = dashboard.request(a, today());
    let (ticket_b, query_b) = dashboard.request(b.clone(), today());
    assert_eq!(query_a.index, "SPX");
    assert_eq!(query_b.index, "NDX");

    assert_eq!(dashboard.complete(ticket_b, Ok(response("QQQ", 5))), ApplyOutcome::Applied);
    assert_eq!(dashboard.complete(ticket_a, Ok(response("SPY", 9))), ApplyOutcome::Stale);

    assert_eq!(dashboard.series().len(), 5);
    assert_eq!(dashboard.series().base_symbol(), Some("QQQ"));
    assert_eq!(dashboard.series().context(), &b);
}

#[test]
fn test_stale_response_before_latest_leaves_loading() {
    let mut dashboard = dashboard();
    let (ticket_a, _) = dashboard.request(SelectionContext::default(), today());
    let (ticket_b, _) = dashboard.request(SelectionContext::new("NDX", "rsi", TimeRange::OneMonth), today());

    assert_eq!(dashboard.complete(ticket_a, Ok(response("SPY", 9))), ApplyOutcome::Stale);
    assert!(dashboard.load_state().is_loading());
    assert!(dashboard.series().is_empty());

    dashboard.complete(ticket_b, Err(FetchError::Status { status: 502, message: "bad gateway".into() }));
    assert!(dashboard.load_state().error().is_some());
}

#[test]
fn test_stale_failure_does_not_clear_series() {
    let mut dashboard = dashboard();
    let (old, _) = dashboard.request(SelectionContext::default(), today());
    let (new, _) = dashboard.retry(today());
    dashboard.complete(new, Ok(response("SPY", 4)));

    let outcome = dashboard.complete(old, Err(FetchError::Transport("timeout".into())));
    assert_eq!(outcome, ApplyOutcome::Stale);
    assert_eq!(dashboard.series().len(), 4);
    assert_eq!(dashboard.load_state(), &LoadState::Ready);
}

#[test]
fn test_retry_after_failure_reloads() {
    let mut dashboard = dashboard();
    let context = SelectionContext::new("CSI300", "value", TimeRange::SixMonths);
    let (ticket, _) = dashboard.request(context.clone(), today());
    dashboard.complete(ticket, Err(FetchError::Transport("refused".into())));
    assert!(dashboard.series().is_empty());

    let (retry, query) = dashboard.retry(today());
    assert_eq!(query.index, "CSI300");
    assert_eq!(dashboard.complete(retry, Ok(response("000300.SH", 3))), ApplyOutcome::Applied);
    assert_eq!(dashboard.series().len(), 3);
    assert_eq!(dashboard.ratios().len(), 3);
}

#[test]
fn test_shrinking_series_clamps_index() {
    let mut dashboard = dashboard();
    let (ticket, _) = dashboard.request(SelectionContext::default(), today());
    dashboard.complete(ticket, Ok(response("SPY", 20)));
    dashboard.seek(15);

    let (ticket, _) = dashboard.request(SelectionContext::new("SPX", "momentum", TimeRange::OneMonth), today());
    dashboard.complete(ticket, Ok(response("SPY", 6)));
    assert_eq!(dashboard.current_index(), Some(5));
    assert_eq!(dashboard.current_date(), Some(jiff::civil::date(2024, 5, 6)));
}
