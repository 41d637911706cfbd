//! Generation-ordered fetch bookkeeping.
//!
//! Every selection change issues a ticket with a strictly increasing
//! generation. A completion is committed only when its generation is the
//! latest one issued and that ticket is still pending; anything else is a
//! stale response and is dropped without touching the view. Results are
//! therefore applied in issuance order, never completion order.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::error::FetchError;
use crate::selection::Selector;
use crate::view_data::ViewData;

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub selector: Selector,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Committed,
    Failed(FetchError),
    Stale,
}

/// Committed, renderable result plus the last surfaced failure.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// `None` until the first successful fetch.
    pub data: Option<ViewData>,
    /// Selector the committed `data` belongs to.
    pub selector: Option<Selector>,
    pub generation: Generation,
    pub error: Option<FetchError>,
    pub updated_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: FetchTicket,
    issued_at: Instant,
}

#[derive(Debug, Clone)]
pub struct FetchCoordinator {
    latest: Generation,
    pending: Option<Pending>,
    timeout: Duration,
}

impl FetchCoordinator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            latest: 0,
            pending: None,
            timeout,
        }
    }

    pub fn latest_generation(&self) -> Generation {
        self.latest
    }

    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref().map(|p| &p.ticket)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts a new request and supersedes whatever was in flight.
    pub fn issue(&mut self, selector: Selector, now: Instant) -> FetchTicket {
        self.latest += 1;
        let ticket = FetchTicket {
            generation: self.latest,
            selector,
        };
        if let Some(prev) = self.pending.as_ref() {
            tracing::debug!(
                superseded = prev.ticket.generation,
                generation = ticket.generation,
                "superseding in-flight fetch"
            );
        }
        tracing::info!(
            generation = ticket.generation,
            selector = %ticket.selector,
            "fetch issued"
        );
        self.pending = Some(Pending {
            ticket: ticket.clone(),
            issued_at: now,
        });
        ticket
    }

    pub fn settle(
        &mut self,
        generation: Generation,
        result: Result<ViewData, FetchError>,
        view: &mut ViewState,
    ) -> Settlement {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket.generation == generation && generation == self.latest);
        if !is_current {
            tracing::debug!(generation, latest = self.latest, "discarding stale response");
            return Settlement::Stale;
        }
        let Some(pending) = self.pending.take() else {
            return Settlement::Stale;
        };

        match result {
            Ok(data) => {
                tracing::info!(
                    generation,
                    selector = %pending.ticket.selector,
                    categories = data.len(),
                    "fetch committed"
                );
                view.data = Some(data);
                view.selector = Some(pending.ticket.selector);
                view.generation = generation;
                view.error = None;
                view.updated_at = Some(Local::now());
                Settlement::Committed
            }
            Err(err) => {
                tracing::warn!(
                    generation,
                    selector = %pending.ticket.selector,
                    error = %err,
                    "fetch failed"
                );
                view.error = Some(err.clone());
                Settlement::Failed(err)
            }
        }
    }

    /// Fails the pending request once it has been outstanding longer than the
    /// timeout. A response arriving afterwards is stale.
    pub fn expire(&mut self, now: Instant, view: &mut ViewState) -> Option<FetchError> {
        let pending = self.pending.as_ref()?;
        if now.saturating_duration_since(pending.issued_at) < self.timeout {
            return None;
        }
        let generation = pending.ticket.generation;
        let err = FetchError::TimedOut(self.timeout.as_secs());
        match self.settle(generation, Err(err.clone()), view) {
            Settlement::Failed(_) => Some(err),
            _ => None,
        }
    }
}
