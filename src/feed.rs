use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crate::coordinator::FetchTicket;
use crate::state::{Delta, ProviderCommand};
use crate::stats_fetch::StatsSource;

pub const DEFAULT_INFLIGHT_MAX: usize = 4;
const CAPACITY_POLL: Duration = Duration::from_millis(25);

/// Runs the command loop on its own thread. Each fetch gets a short-lived
/// worker so a slow response never holds up a newer one; ordering is decided
/// by the receiver of the deltas, not here.
///
/// At most `inflight_max` workers run at once. While at the limit only the
/// newest ticket is held back; older held tickets are already superseded and
/// are dropped without a request.
pub fn spawn_provider(
    source: Arc<dyn StatsSource>,
    inflight_max: usize,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    let inflight_max = inflight_max.max(1);
    thread::spawn(move || {
        tracing::debug!(source = %source.label(), inflight_max, "stats provider started");
        let _ = tx.send(Delta::Log(format!("[INFO] Stats source: {}", source.label())));
        let inflight = Arc::new(AtomicUsize::new(0));
        let mut queued: Option<FetchTicket> = None;

        loop {
            let next = if queued.is_some() {
                match cmd_rx.recv_timeout(CAPACITY_POLL) {
                    Ok(cmd) => Some(cmd),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match cmd_rx.recv() {
                    Ok(cmd) => Some(cmd),
                    Err(_) => break,
                }
            };
            for cmd in next.into_iter().chain(cmd_rx.try_iter()) {
                match cmd {
                    ProviderCommand::FetchWins(ticket) => {
                        if queued.is_none() && inflight.load(Ordering::SeqCst) < inflight_max {
                            run_fetch(&source, &tx, &inflight, ticket);
                        } else if let Some(old) = queued.replace(ticket) {
                            tracing::debug!(
                                generation = old.generation,
                                selector = %old.selector,
                                "superseded before dispatch"
                            );
                        }
                    }
                }
            }

            if inflight.load(Ordering::SeqCst) < inflight_max {
                if let Some(ticket) = queued.take() {
                    run_fetch(&source, &tx, &inflight, ticket);
                }
            }
        }
        tracing::debug!("stats provider stopped");
    })
}

fn run_fetch(
    source: &Arc<dyn StatsSource>,
    tx: &Sender<Delta>,
    inflight: &Arc<AtomicUsize>,
    ticket: FetchTicket,
) {
    inflight.fetch_add(1, Ordering::SeqCst);
    let source = Arc::clone(source);
    let tx = tx.clone();
    let inflight = Arc::clone(inflight);
    thread::spawn(move || {
        let result = source.fetch_wins(&ticket.selector);
        inflight.fetch_sub(1, Ordering::SeqCst);
        let _ = tx.send(Delta::WinsSettled {
            generation: ticket.generation,
            selector: ticket.selector,
            result,
        });
    });
}
