//! The state machine that keeps the two amount fields consistent.
//!
//! Every fetch carries a generation token; any event that invalidates
//! outstanding work (a new fetch, a field clear, a token change) bumps the
//! generation, so results of superseded requests are discarded on arrival
//! rather than cancelled in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

use router::types::{RouteQuote, RouteRequest};
use units::amount::{fixed_decimals, parses_positive, to_display_unit};
use units::slippage::SlippageController;
use units::token::{Side, Token};

use crate::debounce::DebounceTimer;
use crate::state::AmountState;
use crate::types::{FetchOutcome, Phase, RouteFetcher, SwapEvent};

/// Delay before the single follow-up fetch. Tunable lag compensation, not a
/// correctness guarantee.
pub const RETRY_DEBOUNCE_MS: u64 = 750;

/// Derived fields are written at this many fractional digits.
pub const DERIVED_DISPLAY_DECIMALS: usize = 6;

pub struct QuoteSynchronizer<F: RouteFetcher> {
    state: AmountState,
    phase: Phase,
    generation: u64,
    settled: Option<RouteQuote>,
    route_failed: bool,
    first_settlement_seen: bool,
    slippage: SlippageController,
    trader_account_id: Option<String>,
    fetcher: Arc<F>,
    events: Sender<SwapEvent>,
    debounce: DebounceTimer,
}

impl<F: RouteFetcher> QuoteSynchronizer<F> {
    /// `events` is the channel the owner drains; fetch and timer tasks
    /// report back through it.
    pub fn new(
        from_token: Token,
        to_token: Token,
        fetcher: Arc<F>,
        events: Sender<SwapEvent>,
    ) -> Self {
        Self {
            state: AmountState::new(from_token, to_token),
            phase: Phase::Idle,
            generation: 0,
            settled: None,
            route_failed: false,
            first_settlement_seen: false,
            slippage: SlippageController::default(),
            trader_account_id: None,
            fetcher,
            events,
            debounce: DebounceTimer::default(),
        }
    }

    pub fn state(&self) -> &AmountState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last settled quote, if any. This is what the executor consumes.
    pub fn settled_quote(&self) -> Option<&RouteQuote> {
        self.settled.as_ref()
    }

    /// True after a transport-level fetch failure ("no routes found").
    pub fn route_failed(&self) -> bool {
        self.route_failed
    }

    pub fn slippage(&self) -> &SlippageController {
        &self.slippage
    }

    /// Wallet account included in route requests once a session is known.
    pub fn set_trader_account_id(&mut self, account_id: Option<String>) {
        self.trader_account_id = account_id;
    }

    pub fn handle(&mut self, event: SwapEvent) {
        match event {
            SwapEvent::AmountEdited { side, value } => self.on_amount_edited(side, value),
            SwapEvent::TokenChanged { side, token } => self.on_token_changed(side, token),
            SwapEvent::SwitchTokens => self.on_switch_tokens(),
            SwapEvent::SlippageCommitted(pct) => self.on_slippage_committed(pct),
            SwapEvent::RefreshRequested => self.refetch_edited(),
            SwapEvent::FetchSettled {
                generation,
                outcome,
            } => self.on_fetch_settled(generation, outcome),
            SwapEvent::RetryElapsed { generation } => self.on_retry_elapsed(generation),
        }
    }

    fn on_amount_edited(&mut self, side: Side, value: String) {
        self.state.last_edited = side;
        self.state.set_amount(side, value.clone());

        if parses_positive(&value) {
            self.first_settlement_seen = false;
            self.begin_fetch();
        } else {
            self.clear_derived();
        }
    }

    fn on_token_changed(&mut self, side: Side, token: Token) {
        debug!(side = ?side, token = %token.id, "token changed");

        match side {
            Side::In => self.state.from_token = token,
            Side::Out => self.state.to_token = token,
        }

        // Decimals and liquidity differ; amounts never carry across a
        // token change.
        self.state.from_amount.clear();
        self.state.to_amount.clear();
        self.settled = None;
        self.route_failed = false;
        self.first_settlement_seen = false;

        // The next meaningful input is the amount on the side the user did
        // not just re-token.
        self.state.last_edited = side.opposite();

        self.invalidate_outstanding();
    }

    fn on_switch_tokens(&mut self) {
        if self.phase == Phase::Fetching {
            debug!("ignoring token switch while a fetch is in flight");
            return;
        }

        self.state.switch();
        self.settled = None;
        self.route_failed = false;

        if parses_positive(self.state.amount(self.state.last_edited)) {
            self.first_settlement_seen = false;
            self.begin_fetch();
        } else {
            self.invalidate_outstanding();
        }
    }

    fn on_slippage_committed(&mut self, pct: f64) {
        let committed = self.slippage.commit_value(pct);
        debug!(slippage_pct = committed, "slippage committed");
        self.refetch_edited();
    }

    /// Re-issue the fetch the current edited amount would trigger. No-op
    /// when that amount is empty or non-positive.
    fn refetch_edited(&mut self) {
        if parses_positive(self.state.amount(self.state.last_edited)) {
            self.first_settlement_seen = false;
            self.begin_fetch();
        }
    }

    fn on_fetch_settled(&mut self, generation: u64, outcome: FetchOutcome) {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "discarding superseded fetch result"
            );
            return;
        }

        let derived_side = self.state.last_edited.opposite();

        match outcome {
            FetchOutcome::Quote(quote) => {
                let decimals = self.state.token(derived_side).decimals;
                let raw = quote.estimated_amount.for_side(derived_side).unwrap_or("0");
                let display =
                    fixed_decimals(&to_display_unit(raw, decimals), DERIVED_DISPLAY_DECIMALS);
                let derived_zero = !parses_positive(&display);
                self.state.set_amount(derived_side, display);

                debug!(dex_id = %quote.dex_id, generation, "quote settled");
                self.settled = Some(*quote);
                self.route_failed = false;

                let first = !self.first_settlement_seen;
                self.first_settlement_seen = true;

                let edited_positive =
                    parses_positive(self.state.amount(self.state.last_edited));

                if first || (derived_zero && edited_positive) {
                    // Upstream indexing may lag a fresh quote; one debounced
                    // follow-up picks up the corrected amount.
                    self.schedule_retry();
                } else {
                    self.phase = Phase::Idle;
                }
            }
            FetchOutcome::NoRoute => {
                debug!(generation, "no route for current pair/amount");
                self.state.set_amount(derived_side, "");
                self.settled = None;
                self.route_failed = false;
                self.schedule_retry();
            }
            FetchOutcome::Failed(err) => {
                warn!(%err, generation, "route fetch failed");
                self.settled = None;
                self.route_failed = true;
                // A transport error is not silently retried; hammering a
                // failing service helps nobody.
                self.phase = Phase::Idle;
            }
        }
    }

    fn on_retry_elapsed(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }

        if parses_positive(self.state.amount(self.state.last_edited)) {
            self.begin_fetch();
        } else {
            self.phase = Phase::Idle;
        }
    }

    fn begin_fetch(&mut self) {
        self.generation += 1;
        self.phase = Phase::Fetching;
        self.debounce.cancel();

        let request = RouteRequest::from_edit(
            &self.state.from_token,
            &self.state.to_token,
            self.state.amount(self.state.last_edited),
            self.state.last_edited,
            self.slippage.committed_pct(),
            self.trader_account_id.as_deref(),
        );

        let generation = self.generation;
        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events.clone();

        debug!(generation, "issuing route fetch");

        tokio::spawn(async move {
            let outcome = match fetcher.fetch_route(&request).await {
                Ok(Some(quote)) => FetchOutcome::Quote(Box::new(quote)),
                Ok(None) => FetchOutcome::NoRoute,
                Err(err) => FetchOutcome::Failed(err),
            };

            let _ = events
                .send(SwapEvent::FetchSettled {
                    generation,
                    outcome,
                })
                .await;
        });
    }

    fn schedule_retry(&mut self) {
        self.phase = Phase::RetryScheduled;
        self.debounce.schedule(
            Duration::from_millis(RETRY_DEBOUNCE_MS),
            self.generation,
            self.events.clone(),
        );
    }

    /// Clear the derived field and the settled quote after a non-positive
    /// edit, and make sure nothing in flight can resurrect them.
    fn clear_derived(&mut self) {
        let derived_side = self.state.last_edited.opposite();
        self.state.set_amount(derived_side, "");
        self.settled = None;
        self.route_failed = false;
        self.invalidate_outstanding();
    }

    /// Bump the generation so in-flight fetch results and pending retries
    /// are discarded on arrival.
    fn invalidate_outstanding(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.debounce.cancel();
    }
}
