//! Serialization gate.
//!
//! With serialization on, the dispatcher draws a [`Ticket`] for each session
//! in arrival order, and each handler blocks in [`Ticket::enter`] until every
//! earlier session has finished. With serialization off, tickets are inert and
//! handlers run fully concurrently.

use std::collections::BTreeSet;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Process-wide admission policy for session handlers, fixed at startup.
#[derive(Clone)]
pub enum SerializationGate {
    /// No mutual exclusion.
    Concurrent,
    /// One session at a time, first come first served.
    Serialized(Arc<TicketLock>),
}

impl SerializationGate {
    pub fn new(serialize: bool) -> Self {
        if serialize {
            Self::Serialized(Arc::new(TicketLock::default()))
        } else {
            Self::Concurrent
        }
    }

    pub fn is_serialized(&self) -> bool {
        matches!(self, Self::Serialized(_))
    }

    /// Reserve the next place in line. Must be called in arrival order.
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Concurrent => Ticket { slot: None },
            Self::Serialized(lock) => Ticket {
                slot: Some((Arc::clone(lock), lock.draw())),
            },
        }
    }
}

impl std::fmt::Debug for SerializationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concurrent => f.write_str("SerializationGate::Concurrent"),
            Self::Serialized(_) => f.write_str("SerializationGate::Serialized"),
        }
    }
}

/// A reserved place in line.
///
/// Dropping a ticket without entering gives up its turn so later sessions are
/// not held back.
#[must_use = "a ticket must be entered or dropped"]
pub struct Ticket {
    slot: Option<(Arc<TicketLock>, u64)>,
}

impl Ticket {
    /// Block until it is this ticket's turn.
    pub fn enter(mut self) -> GateGuard {
        let slot = self.slot.take();
        if let Some((lock, number)) = &slot {
            lock.wait_for(*number);
        }
        GateGuard { slot }
    }

    /// The ticket's position, or `None` for an inert ticket.
    pub fn number(&self) -> Option<u64> {
        self.slot.as_ref().map(|(_, number)| *number)
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if let Some((lock, number)) = self.slot.take() {
            lock.abandon(number);
        }
    }
}

/// Held while a session runs. Dropping it admits the next ticket.
pub struct GateGuard {
    slot: Option<(Arc<TicketLock>, u64)>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        if let Some((lock, number)) = self.slot.take() {
            lock.release(number);
        }
    }
}

/// FIFO ticket lock backing [`SerializationGate::Serialized`].
#[derive(Default)]
pub struct TicketLock {
    state: Mutex<TicketState>,
    turn: Condvar,
}

#[derive(Default)]
struct TicketState {
    next_ticket: u64,
    serving: u64,
    abandoned: BTreeSet<u64>,
}

impl TicketState {
    fn advance(&mut self) {
        self.serving += 1;
        while self.abandoned.remove(&self.serving) {
            self.serving += 1;
        }
    }
}

impl TicketLock {
    fn lock(&self) -> MutexGuard<'_, TicketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn draw(&self) -> u64 {
        let mut state = self.lock();
        let number = state.next_ticket;
        state.next_ticket += 1;
        number
    }

    fn wait_for(&self, number: u64) {
        let mut state = self.lock();
        while state.serving != number {
            state = self
                .turn
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn release(&self, number: u64) {
        let mut state = self.lock();
        debug_assert_eq!(state.serving, number);
        state.advance();
        self.turn.notify_all();
    }

    fn abandon(&self, number: u64) {
        let mut state = self.lock();
        if state.serving == number {
            state.advance();
        } else {
            state.abandoned.insert(number);
        }
        self.turn.notify_all();
    }
}
