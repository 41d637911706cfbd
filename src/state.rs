use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;

use crate::chart::{ChartDescription, describe};
use crate::config::Config;
use crate::coordinator::{FetchCoordinator, FetchTicket, Generation, Settlement, ViewState};
use crate::error::{FetchError, SelectionError};
use crate::gallery::{CHART_KINDS, DEFAULT_CHART_KIND};
use crate::selection::{OptionSet, SelectOutcome, SelectionState, Selector};
use crate::view_data::ViewData;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Wins,
    Gallery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus<'a> {
    Idle,
    Loading(&'a Selector),
    Failed(&'a FetchError),
    Ready,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub players: SelectionState,
    pub chart_kinds: SelectionState,
    pub coordinator: FetchCoordinator,
    pub view: ViewState,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub source_label: String,
}

#[derive(Debug, Clone)]
pub enum Delta {
    WinsSettled {
        generation: Generation,
        selector: Selector,
        result: Result<ViewData, FetchError>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchWins(FetchTicket),
}

impl AppState {
    pub fn new(players: SelectionState, timeout: Duration) -> Result<Self, SelectionError> {
        let chart_kinds =
            SelectionState::new(OptionSet::new(CHART_KINDS)?, Some(DEFAULT_CHART_KIND))?;
        Ok(Self {
            screen: Screen::Wins,
            players,
            chart_kinds,
            coordinator: FetchCoordinator::new(timeout),
            view: ViewState::default(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            source_label: String::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let options = OptionSet::new(&config.players).context("invalid STATS_PLAYERS")?;
        let players = SelectionState::new(options, config.initial_player.as_deref())
            .context("invalid STATS_INITIAL_PLAYER")?;
        let mut state = Self::new(players, config.request_timeout)?;
        state.source_label = config.source_label();
        Ok(state)
    }

    /// Eager fetch for the initial selection.
    pub fn activate(&mut self) -> FetchTicket {
        self.issue_current()
    }

    /// Forces a fetch of the current player even though nothing changed.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue_current()
    }

    pub fn select_player(&mut self, label: &str) -> Result<Option<FetchTicket>, SelectionError> {
        match self.players.select(label) {
            Ok(outcome) => Ok(self.on_player_outcome(outcome)),
            Err(err) => {
                self.push_log(format!("[WARN] Rejected selection: {err}"));
                Err(err)
            }
        }
    }

    /// Jump to the player at `index` (numeric hotkeys, zero-based).
    pub fn select_player_index(
        &mut self,
        index: usize,
    ) -> Result<Option<FetchTicket>, SelectionError> {
        match self.players.select_index(index) {
            Ok(outcome) => Ok(self.on_player_outcome(outcome)),
            Err(err) => {
                self.push_log(format!("[WARN] Rejected selection: {err}"));
                Err(err)
            }
        }
    }

    pub fn select_next_player(&mut self) -> Option<FetchTicket> {
        let outcome = self.players.select_next();
        self.on_player_outcome(outcome)
    }

    pub fn select_prev_player(&mut self) -> Option<FetchTicket> {
        let outcome = self.players.select_prev();
        self.on_player_outcome(outcome)
    }

    pub fn select_next_chart_kind(&mut self) {
        self.chart_kinds.select_next();
    }

    pub fn select_prev_chart_kind(&mut self) {
        self.chart_kinds.select_prev();
    }

    pub fn select_chart_kind_index(&mut self, index: usize) -> Result<(), SelectionError> {
        self.chart_kinds.select_index(index).map(|_| ())
    }

    fn on_player_outcome(&mut self, outcome: SelectOutcome) -> Option<FetchTicket> {
        match outcome {
            SelectOutcome::Changed(_) => Some(self.issue_current()),
            SelectOutcome::Unchanged => None,
        }
    }

    fn issue_current(&mut self) -> FetchTicket {
        let selector = self.players.current().clone();
        self.coordinator.issue(selector, Instant::now())
    }

    /// The ticket never reached the provider.
    pub fn dispatch_failed(&mut self, ticket: &FetchTicket) {
        apply_delta(
            self,
            Delta::WinsSettled {
                generation: ticket.generation,
                selector: ticket.selector.clone(),
                result: Err(FetchError::Disconnected),
            },
        );
    }

    pub fn expire_pending(&mut self, now: Instant) {
        let selector = self.coordinator.pending().map(|t| t.selector.clone());
        if let Some(err) = self.coordinator.expire(now, &mut self.view) {
            let name = selector.map(|s| s.to_string()).unwrap_or_default();
            self.push_log(format!("[WARN] Failed to load {name}: {err}"));
        }
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_loading()
    }

    pub fn status(&self) -> LoadStatus<'_> {
        if let Some(ticket) = self.coordinator.pending() {
            return LoadStatus::Loading(&ticket.selector);
        }
        if let Some(err) = self.view.error.as_ref() {
            return LoadStatus::Failed(err);
        }
        if self.view.data.is_some() {
            return LoadStatus::Ready;
        }
        LoadStatus::Idle
    }

    /// Chart for the committed data, titled with the player it was fetched
    /// for (which lags the selection while a fetch is pending).
    pub fn chart(&self) -> Option<ChartDescription> {
        let data = self.view.data.as_ref()?;
        let selector = self.view.selector.as_ref()?;
        Some(describe(data, selector))
    }

    /// Console entries are stamped with the local wall-clock time.
    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::WinsSettled {
            generation,
            selector,
            result,
        } => match state
            .coordinator
            .settle(generation, result, &mut state.view)
        {
            Settlement::Committed => {
                let categories = state.view.data.as_ref().map_or(0, ViewData::len);
                state.push_log(format!(
                    "[INFO] Loaded {selector}: {categories} champions"
                ));
            }
            Settlement::Failed(err) => {
                state.push_log(format!("[WARN] Failed to load {selector}: {err}"));
            }
            Settlement::Stale => {}
        },
        Delta::Log(msg) => state.push_log(msg),
    }
}
