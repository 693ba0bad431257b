//! Series ownership and last-request-wins loading.
//!
//! Every fetch is issued a strictly increasing [`RequestTicket`]. Only the
//! most recently issued ticket may complete; anything older is dropped on
//! arrival without touching the series. A successful completion swaps in
//! a freshly normalised series in one step; a failure clears it.

use jiff::civil::Date;

use crate::error::FetchError;
use crate::model::{DistributionSeries, SelectionContext};
use crate::normalize::normalize;
use crate::wire::{DistributionQuery, DistributionResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(FetchError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What [`Session::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The series was replaced.
    Applied,
    /// The ticket was superseded; nothing changed.
    Stale,
    /// The load failed and the series was cleared.
    Failed,
}

impl ApplyOutcome {
    /// Whether the visible series changed.
    pub fn replaced_series(self) -> bool {
        !matches!(self, ApplyOutcome::Stale)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    context: SelectionContext,
    series: DistributionSeries,
    state: LoadState,
    issued: u64,
    pending: Option<(RequestTicket, SelectionContext)>,
}

impl Session {
    pub fn new(context: SelectionContext) -> Self {
        Self {
            series: DistributionSeries::empty(context.clone()),
            context,
            state: LoadState::Idle,
            issued: 0,
            pending: None,
        }
    }

    /// Most recently requested selection.
    pub fn context(&self) -> &SelectionContext {
        &self.context
    }

    pub fn series(&self) -> &DistributionSeries {
        &self.series
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn latest_ticket(&self) -> Option<RequestTicket> {
        self.pending.as_ref().map(|(ticket, _)| *ticket)
    }

    /// Start loading `context`, superseding any request in flight.
    pub fn begin_request(&mut self, context: SelectionContext, today: Date) -> (RequestTicket, DistributionQuery) {
        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        let query = DistributionQuery::for_selection(&context, today);

        if let Some((previous, _)) = &self.pending {
            tracing::debug!(superseded = previous.0, ticket = ticket.0, "superseding in-flight request");
        }
        tracing::info!(
            ticket = ticket.0,
            index = %context.index,
            metric = %context.metric,
            range = %context.range,
            "requesting distribution"
        );

        self.context = context.clone();
        self.pending = Some((ticket, context));
        self.state = LoadState::Loading;
        (ticket, query)
    }

    /// Re-issue the current selection under a new ticket.
    pub fn retry(&mut self, today: Date) -> (RequestTicket, DistributionQuery) {
        self.begin_request(self.context.clone(), today)
    }

    /// Apply the result for `ticket` if it is still the latest request.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<DistributionResponse, FetchError>,
    ) -> ApplyOutcome {
        let context = match self.pending.take() {
            Some((latest, context)) if latest == ticket => context,
            other => {
                tracing::debug!(
                    ticket = ticket.0,
                    latest = ?other.as_ref().map(|(t, _)| t.0),
                    "discarding stale response"
                );
                self.pending = other;
                return ApplyOutcome::Stale;
            }
        };

        match result.and_then(|response| normalize(response, &context)) {
            Ok(series) => {
                tracing::info!(
                    ticket = ticket.0,
                    snapshots = series.len(),
                    anomalies = series.anomalies().len(),
                    "distribution loaded"
                );
                self.series = series;
                self.state = LoadState::Ready;
                ApplyOutcome::Applied
            }
            Err(err) => {
                tracing::error!(ticket = ticket.0, error = %err, "distribution load failed");
                self.series = DistributionSeries::empty(context);
                self.state = LoadState::Failed(err);
                ApplyOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimeRange;
    use crate::wire::decode_response;

    fn today() -> Date {
        jiff::civil::date(2024, 6, 30)
    }

    fn response(date: &str) -> DistributionResponse {
        decode_response(&format!(
            r#"{{"data": [{{"date": "{date}", "distribution": {{"0-20": {{"count": 1}}}}, "total_symbols": 1}}]}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_tickets_increase() {
        let mut session = Session::new(SelectionContext::default());
        let (a, _) = session.begin_request(SelectionContext::default(), today());
        let (b, _) = session.retry(today());
        assert!(b > a);
        assert_eq!(session.latest_ticket(), Some(b));
        assert!(session.state().is_loading());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = Session::new(SelectionContext::default());
        let (a, _) = session.begin_request(SelectionContext::default(), today());
        let (b, _) = session.retry(today());

        assert_eq!(session.complete(a, Ok(response("2024-01-02"))), ApplyOutcome::Stale);
        assert!(session.series().is_empty());
        assert!(session.state().is_loading());

        assert_eq!(session.complete(b, Ok(response("2024-01-03"))), ApplyOutcome::Applied);
        assert_eq!(session.series().len(), 1);
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut session = Session::new(SelectionContext::default());
        let (a, _) = session.begin_request(SelectionContext::default(), today());
        assert_eq!(session.complete(a, Ok(response("2024-01-02"))), ApplyOutcome::Applied);
        assert_eq!(session.complete(a, Ok(response("2024-01-03"))), ApplyOutcome::Stale);
        assert_eq!(session.series().snapshots()[0].date, jiff::civil::date(2024, 1, 2));
    }

    #[test]
    fn test_failure_clears_series() {
        let mut session = Session::new(SelectionContext::default());
        let (a, _) = session.begin_request(SelectionContext::default(), today());
        session.complete(a, Ok(response("2024-01-02")));

        let context = SelectionContext::new("NDX", "rsi", TimeRange::ThreeMonths);
        let (b, _) = session.begin_request(context.clone(), today());
        let outcome = session.complete(b, Err(FetchError::Transport("connection refused".into())));
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(session.series().is_empty());
        assert_eq!(session.series().context(), &context);
        assert!(matches!(session.state().error(), Some(FetchError::Transport(_))));
    }

    #[test]
    fn test_bad_date_fails_whole_load() {
        let mut session = Session::new(SelectionContext::default());
        let (a, _) = session.begin_request(SelectionContext::default(), today());
        let outcome = session.complete(a, Ok(response("not-a-date")));
        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(matches!(session.state(), LoadState::Failed(FetchError::InvalidDate { .. })));
    }
}
