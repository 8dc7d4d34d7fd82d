use dashmap::DashMap;
use dnsrelay_domain::Question;
use rustc_hash::FxBuildHasher;
use std::net::SocketAddr;

/// A client waiting for the answer to an in-flight question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Waiter {
    pub client: SocketAddr,
    /// Transaction ID the client used; its copy of the reply must carry it.
    pub transaction_id: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First registrant for the question. It owns the upstream round trip
    /// and must call [`InflightRegistry::complete`] when it ends.
    Leader,
    /// The question is already being forwarded; the waiter is served by the
    /// leader's reply.
    Follower,
}

/// Maps each outstanding question to the clients waiting on it.
#[derive(Debug, Default)]
pub struct InflightRegistry {
    pending: DashMap<Question, Vec<Waiter>, FxBuildHasher>,
}

impl InflightRegistry {
    pub fn new() -> Self {
        Self {
            pending: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn register(&self, question: &Question, waiter: Waiter) -> Registration {
        match self.pending.entry(question.clone()) {
            dashmap::Entry::Occupied(mut e) => {
                e.get_mut().push(waiter);
                Registration::Follower
            }
            dashmap::Entry::Vacant(e) => {
                e.insert(vec![waiter]);
                Registration::Leader
            }
        }
    }

    /// Removes `question` and returns every waiter registered for it, leader
    /// first.
    pub fn complete(&self, question: &Question) -> Vec<Waiter> {
        self.pending
            .remove(question)
            .map(|(_, waiters)| waiters)
            .unwrap_or_default()
    }

    /// Number of questions currently in flight.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn waiters(&self, question: &Question) -> usize {
        self.pending.get(question).map(|w| w.len()).unwrap_or(0)
    }
}
