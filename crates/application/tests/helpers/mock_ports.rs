use async_trait::async_trait;
use bytes::Bytes;
use dnsrelay_application::ports::{
    CachedReply, Direction, MessageObserver, ResponseCache, UpstreamTransport,
};
use dnsrelay_domain::{DecodeError, DomainError, Message, Question};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::Notify;

/// Transport that replays scripted replies in order and records every
/// forwarded query.
///
/// With `gated`, each `forward` signals `started` and then parks until
/// `release` is notified, so tests can observe state while a round trip is
/// in flight.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Bytes, DomainError>>>,
    forwarded: Mutex<Vec<Vec<u8>>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(started: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((started, release)),
            ..Self::default()
        }
    }

    pub fn push_reply(&self, reply: Vec<u8>) {
        self.replies.lock().unwrap().push_back(Ok(Bytes::from(reply)));
    }

    pub fn push_error(&self, error: DomainError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn forwarded(&self) -> Vec<Vec<u8>> {
        self.forwarded.lock().unwrap().clone()
    }

    pub fn forward_count(&self) -> usize {
        self.forwarded.lock().unwrap().len()
    }
}

#[async_trait]
impl UpstreamTransport for MockTransport {
    async fn forward(&self, query: &[u8]) -> Result<Bytes, DomainError> {
        self.forwarded.lock().unwrap().push(query.to_vec());

        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(DomainError::TransportAllServersUnreachable))
    }
}

#[derive(Default)]
pub struct MockCache {
    entries: RwLock<HashMap<Question, (Bytes, u32)>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl_of(&self, question: &Question) -> Option<u32> {
        self.entries.read().unwrap().get(question).map(|(_, ttl)| *ttl)
    }
}

impl ResponseCache for MockCache {
    fn get(&self, question: &Question) -> Option<CachedReply> {
        self.entries
            .read()
            .unwrap()
            .get(question)
            .map(|(bytes, ttl)| CachedReply {
                bytes: bytes.clone(),
                remaining_ttl: *ttl,
            })
    }

    fn insert(&self, question: &Question, reply: Bytes, ttl: u32) {
        self.entries
            .write()
            .unwrap()
            .insert(question.clone(), (reply, ttl));
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    fn remove_expired(&self) -> usize {
        0
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    pub decoded: Mutex<Vec<(Direction, u16)>>,
    pub rejected: Mutex<Vec<(Direction, DecodeError)>>,
    calls: AtomicUsize,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> Vec<(Direction, DecodeError)> {
        self.rejected.lock().unwrap().clone()
    }

    pub fn decoded(&self) -> Vec<(Direction, u16)> {
        self.decoded.lock().unwrap().clone()
    }
}

impl MessageObserver for RecordingObserver {
    fn on_decoded(&self, direction: Direction, message: &Message, _raw: &[u8]) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.decoded
            .lock()
            .unwrap()
            .push((direction, message.header.id));
    }

    fn on_rejected(&self, direction: Direction, _raw: &[u8], error: &DecodeError) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.rejected.lock().unwrap().push((direction, error.clone()));
    }
}
