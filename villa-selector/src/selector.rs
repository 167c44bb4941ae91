use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use villa_core::stay::validate_stay;

use crate::gateway::{GatewayResponse, ReservationGateway};

/// The candidate check-in/check-out pair plus everything the booking panel
/// derives from it. Replaces scattered reads of shared page inputs with one
/// small state object; a thin UI adapter maps `Summary` onto the page.
#[derive(Debug, Clone)]
pub struct StaySelector {
    today: NaiveDate,
    nightly_rate: i64,
    checkin: Option<NaiveDate>,
    checkout: Option<NaiveDate>,
}

/// Pure derived display state for the booking summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub nights: i64,
    pub total: i64,
    pub submittable: bool,
}

/// Outcome of a submission attempt, ready for the UI to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFeedback {
    /// Guarded no-op: the candidate interval was incomplete.
    NotReady,
    /// Booking confirmed by the authority.
    Confirmed,
    /// The authority refused, with its message (conflict, past dates, ...).
    Rejected(String),
    /// No valid session; the UI should send the user to the login flow.
    LoginRequired,
    /// Transient problem (network failure or an undecodable response); show
    /// a generic retry message, never an automatic retry.
    TryAgain,
}

impl StaySelector {
    pub fn new(today: NaiveDate, nightly_rate: i64) -> Self {
        Self {
            today,
            nightly_rate,
            checkin: None,
            checkout: None,
        }
    }

    pub fn checkin(&self) -> Option<NaiveDate> {
        self.checkin
    }

    pub fn checkout(&self) -> Option<NaiveDate> {
        self.checkout
    }

    /// Earliest selectable check-in: always today.
    pub fn checkin_min(&self) -> NaiveDate {
        self.today
    }

    /// Earliest selectable check-out: the chosen check-in, or today when no
    /// check-in is held.
    pub fn checkout_min(&self) -> NaiveDate {
        self.checkin.unwrap_or(self.today)
    }

    /// A past date clears the field. A valid check-in also clears a checkout
    /// that is no longer strictly after it.
    pub fn set_checkin(&mut self, date: NaiveDate) {
        if date < self.today {
            self.checkin = None;
            return;
        }

        self.checkin = Some(date);
        if let Some(checkout) = self.checkout {
            if checkout <= date {
                self.checkout = None;
            }
        }
    }

    /// A checkout can never be chosen first, nor land on or before the
    /// check-in; either case clears both fields.
    pub fn set_checkout(&mut self, date: NaiveDate) {
        if date < self.today {
            self.checkout = None;
            return;
        }

        match self.checkin {
            Some(checkin) if date > checkin => self.checkout = Some(date),
            _ => {
                self.checkin = None;
                self.checkout = None;
            }
        }
    }

    /// Whole nights between the endpoints; 0 while either is missing.
    /// Strictly positive whenever both are set, by the input rules above.
    pub fn nights(&self) -> i64 {
        match (self.checkin, self.checkout) {
            (Some(checkin), Some(checkout)) => (checkout - checkin).num_days(),
            _ => 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.nights() * self.nightly_rate
    }

    pub fn is_submittable(&self) -> bool {
        self.nights() > 0
    }

    pub fn summary(&self) -> Summary {
        Summary {
            nights: self.nights(),
            total: self.total(),
            submittable: self.is_submittable(),
        }
    }

    pub fn clear(&mut self) {
        self.checkin = None;
        self.checkout = None;
    }

    /// Send the candidate interval to the reservation authority. No-op while
    /// the interval is incomplete. The selector keeps its state afterwards;
    /// clearing on success is the UI's call.
    pub async fn submit(&self, gateway: &dyn ReservationGateway) -> SubmitFeedback {
        let (Some(start), Some(end)) = (self.checkin, self.checkout) else {
            return SubmitFeedback::NotReady;
        };

        // Same validation the authority re-runs server-side.
        if validate_stay(start, end, self.today).is_err() {
            return SubmitFeedback::NotReady;
        }

        match gateway.submit(start, end).await {
            Ok(GatewayResponse::Accepted) => SubmitFeedback::Confirmed,
            Ok(GatewayResponse::Rejected(message)) => SubmitFeedback::Rejected(message),
            Ok(GatewayResponse::Unauthenticated) => SubmitFeedback::LoginRequired,
            // An undecodable body means the server misbehaved, not that the
            // session expired; surface it as a retry, not a login redirect.
            Ok(GatewayResponse::Malformed) => SubmitFeedback::TryAgain,
            Err(e) => {
                warn!("Reservation submission failed: {}", e);
                SubmitFeedback::TryAgain
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::NetworkError;
    use async_trait::async_trait;

    const RATE: i64 = 2500;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn selector() -> StaySelector {
        StaySelector::new(date("2025-05-20"), RATE)
    }

    struct StubGateway(Result<GatewayResponse, &'static str>);

    #[async_trait]
    impl ReservationGateway for StubGateway {
        async fn submit(
            &self,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<GatewayResponse, NetworkError> {
            self.0
                .clone()
                .map_err(|e| NetworkError(e.to_string()))
        }
    }

    #[test]
    fn test_four_night_stay_summary() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        let summary = sel.summary();
        assert_eq!(summary.nights, 4);
        assert_eq!(summary.total, 4 * RATE);
        assert!(summary.submittable);
    }

    #[test]
    fn test_checkout_equal_to_checkin_cleared() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-10"));
        sel.set_checkout(date("2025-06-10"));

        assert_eq!(sel.checkout(), None);
        assert_eq!(sel.nights(), 0);
        assert!(!sel.is_submittable());
    }

    #[test]
    fn test_past_checkin_rejected() {
        let mut sel = selector();
        sel.set_checkin(date("2025-05-19"));
        assert_eq!(sel.checkin(), None);
    }

    #[test]
    fn test_checkout_first_clears_both() {
        let mut sel = selector();
        sel.set_checkout(date("2025-06-05"));
        assert_eq!(sel.checkin(), None);
        assert_eq!(sel.checkout(), None);
    }

    #[test]
    fn test_moving_checkin_past_checkout_clears_checkout() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));
        sel.set_checkin(date("2025-06-05"));

        assert_eq!(sel.checkin(), Some(date("2025-06-05")));
        assert_eq!(sel.checkout(), None);
    }

    #[test]
    fn test_checkout_min_follows_checkin() {
        let mut sel = selector();
        assert_eq!(sel.checkout_min(), date("2025-05-20"));

        sel.set_checkin(date("2025-06-01"));
        assert_eq!(sel.checkout_min(), date("2025-06-01"));

        sel.set_checkin(date("2025-05-01")); // past, clears the field
        assert_eq!(sel.checkout_min(), date("2025-05-20"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        sel.clear();
        let first = sel.summary();
        sel.clear();
        let second = sel.summary();

        assert_eq!(first, second);
        assert_eq!(first.nights, 0);
        assert_eq!(first.total, 0);
        assert!(!first.submittable);
    }

    #[tokio::test]
    async fn test_submit_guarded_when_incomplete() {
        let sel = selector();
        let gateway = StubGateway(Ok(GatewayResponse::Accepted));
        assert_eq!(sel.submit(&gateway).await, SubmitFeedback::NotReady);
    }

    #[tokio::test]
    async fn test_submit_confirmed() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        let gateway = StubGateway(Ok(GatewayResponse::Accepted));
        assert_eq!(sel.submit(&gateway).await, SubmitFeedback::Confirmed);

        // Submission does not clear the selection.
        assert_eq!(sel.nights(), 4);
    }

    #[tokio::test]
    async fn test_submit_conflict_shows_server_message() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        let gateway = StubGateway(Ok(GatewayResponse::Rejected(
            "Those dates are already reserved.".into(),
        )));
        assert_eq!(
            sel.submit(&gateway).await,
            SubmitFeedback::Rejected("Those dates are already reserved.".into())
        );
    }

    #[tokio::test]
    async fn test_submit_unauthenticated_goes_to_login() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        let gateway = StubGateway(Ok(GatewayResponse::Unauthenticated));
        assert_eq!(sel.submit(&gateway).await, SubmitFeedback::LoginRequired);
    }

    #[tokio::test]
    async fn test_malformed_response_is_a_retry_not_a_login() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        let gateway = StubGateway(Ok(GatewayResponse::Malformed));
        assert_eq!(sel.submit(&gateway).await, SubmitFeedback::TryAgain);
    }

    #[tokio::test]
    async fn test_network_failure_is_a_retry() {
        let mut sel = selector();
        sel.set_checkin(date("2025-06-01"));
        sel.set_checkout(date("2025-06-05"));

        let gateway = StubGateway(Err("connection refused"));
        assert_eq!(sel.submit(&gateway).await, SubmitFeedback::TryAgain);
    }
}
