//! Game loop module - the single authoritative apply loop
//!
//! Each tick drains the inbound queue and applies intents one by one, runs the
//! registry sweeps with the wall-clock time elapsed since the previous tick,
//! and flushes queued notifications to the transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use satchel_core::protocol::ClientIntent;
use satchel_core::types::ActorId;

use crate::authority::Authority;
use crate::error::RequestError;
use crate::hands::Hands;
use crate::transport::{ClientConnection, Transport};

/// Counters for one tick, mostly for logs and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub applied: usize,
    pub rejected: usize,
    pub malformed: usize,
    pub pruned: usize,
    pub delivered: usize,
}

pub struct GameLoop {
    authority: Authority,
    transport: Transport,
    tick_interval: Duration,
    ticks: u64,
}

impl GameLoop {
    pub fn new(authority: Authority, transport: Transport, tick_interval: Duration) -> Self {
        Self {
            authority,
            transport,
            tick_interval,
            ticks: 0,
        }
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    pub fn authority_mut(&mut self) -> &mut Authority {
        &mut self.authority
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Connects `actor` to both the transport and the authority.
    pub fn connect(&mut self, actor: ActorId, hands: Option<Box<dyn Hands>>) -> Option<ClientConnection> {
        if !self.authority.connect_actor(actor, hands) {
            return None;
        }
        Some(self.transport.connect(actor))
    }

    pub fn disconnect(&mut self, actor: ActorId) {
        self.authority.disconnect_actor(actor);
        self.transport.disconnect(actor);
    }

    /// Runs one tick with `elapsed` wall-clock time since the previous one.
    pub fn tick(&mut self, elapsed: Duration) -> TickReport {
        let mut report = TickReport::default();
        self.ticks += 1;

        for inbound in self.transport.receive() {
            let intent = match ClientIntent::from_bytes(&inbound.bytes) {
                Ok(intent) => intent,
                Err(e) => {
                    log::warn!("Discarding malformed frame from {}: {e}", inbound.actor);
                    report.malformed += 1;
                    continue;
                }
            };
            match self.authority.handle_intent(inbound.actor, &intent) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    log_rejection(inbound.actor, &intent, &e);
                    report.rejected += 1;
                }
            }
        }

        report.pruned = self.authority.update(elapsed).len();
        report.delivered = self.flush();

        for actor in self.transport.take_lost() {
            self.authority.disconnect_actor(actor);
        }
        report
    }

    fn flush(&mut self) -> usize {
        let envelopes = self.authority.drain_outbox();
        let count = envelopes.len();
        for envelope in &envelopes {
            if let Err(e) = self.transport.deliver(envelope) {
                log::error!("Failed to encode notification: {e}");
            }
        }
        count
    }

    /// Ticks at the configured rate until `quit` is set.
    pub fn run(&mut self, quit: &AtomicBool) {
        log::info!(
            "Entering apply loop ({:.1} ticks/s)",
            1.0 / self.tick_interval.as_secs_f64()
        );
        let mut last = Instant::now();
        while !quit.load(Ordering::SeqCst) {
            let start = Instant::now();
            let report = self.tick(start - last);
            last = start;
            if report.rejected > 0 || report.malformed > 0 {
                log::debug!("Tick {}: {report:?}", self.ticks);
            }

            let spent = start.elapsed();
            if spent < self.tick_interval {
                thread::sleep(self.tick_interval - spent);
            } else {
                log::warn!("Tick {} overran its budget: {spent:.2?}", self.ticks);
            }
        }
        log::info!("Leaving apply loop after {} ticks", self.ticks);
    }
}

/// Rejections are silent towards the client. Only inconsistent state is
/// logged above debug level.
fn log_rejection(actor: ActorId, intent: &ClientIntent, error: &RequestError) {
    if error.is_internal() {
        log::error!("Rejected {intent:?} from {actor}: {error}");
    } else {
        log::debug!("Rejected {intent:?} from {actor}: {error}");
    }
}
