use crate::ports::{Direction, MessageObserver, ResponseCache, UpstreamTransport};
use crate::services::{InflightRegistry, Registration, Waiter};
use bytes::{Bytes, BytesMut};
use dnsrelay_domain::wire::{decode_question, HEADER_LEN};
use dnsrelay_domain::{DomainError, Message, Question, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// One reply datagram to send back to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub client: SocketAddr,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct RelayOutcome {
    pub deliveries: Vec<Delivery>,
    pub cache_hit: bool,
    /// The query joined a round trip already in flight and is answered by
    /// the leader's deliveries.
    pub coalesced: bool,
}

impl RelayOutcome {
    fn single(client: SocketAddr, bytes: Bytes) -> Self {
        Self {
            deliveries: vec![Delivery { client, bytes }],
            ..Default::default()
        }
    }
}

/// Clears the leader's registration if the round trip is abandoned before
/// it completes, so followers are never stuck behind a dead leader.
struct LeaderGuard<'a> {
    inflight: &'a InflightRegistry,
    question: &'a Question,
    armed: bool,
}

impl LeaderGuard<'_> {
    fn complete(mut self) -> Vec<Waiter> {
        self.armed = false;
        self.inflight.complete(self.question)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let dropped = self.inflight.complete(self.question);
            debug!(
                question = %self.question,
                waiters = dropped.len(),
                "Dropping waiters of failed round trip"
            );
        }
    }
}

pub struct RelayQueryUseCase {
    transport: Arc<dyn UpstreamTransport>,
    observer: Arc<dyn MessageObserver>,
    inflight: Arc<InflightRegistry>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl RelayQueryUseCase {
    pub fn new(transport: Arc<dyn UpstreamTransport>, observer: Arc<dyn MessageObserver>) -> Self {
        Self {
            transport,
            observer,
            inflight: Arc::new(InflightRegistry::new()),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn inflight(&self) -> &InflightRegistry {
        &self.inflight
    }

    /// Relays one client datagram.
    ///
    /// Returns the replies to send. A follower gets an empty outcome: its
    /// reply is among the leader's deliveries.
    pub async fn execute(
        &self,
        datagram: &[u8],
        client: SocketAddr,
    ) -> Result<RelayOutcome, DomainError> {
        let query = self.decode(Direction::ClientQuery, datagram)?;
        if query.header.is_response() {
            return Err(DomainError::NotAQuery);
        }

        let Some(question) = query.single_question() else {
            debug!(
                %client,
                questions = query.questions.len(),
                "Forwarding query without coalescing"
            );
            let reply = self.transport.forward(datagram).await?;
            self.decode(Direction::UpstreamReply, &reply)?;
            return Ok(RelayOutcome::single(client, reply));
        };

        let transaction_id = query.header.id;

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(question)) {
            debug!(
                %client,
                %question,
                remaining_ttl = cached.remaining_ttl,
                "Cache HIT"
            );
            let bytes = answer_from_cache(&cached.bytes, transaction_id, datagram);
            return Ok(RelayOutcome {
                cache_hit: true,
                ..RelayOutcome::single(client, bytes)
            });
        }

        let waiter = Waiter {
            client,
            transaction_id,
        };
        if self.inflight.register(question, waiter) == Registration::Follower {
            debug!(%client, %question, "Joined in-flight query");
            return Ok(RelayOutcome {
                coalesced: true,
                ..Default::default()
            });
        }

        let guard = LeaderGuard {
            inflight: &self.inflight,
            question,
            armed: true,
        };

        let reply_bytes = self.transport.forward(datagram).await?;
        let reply = self.decode(Direction::UpstreamReply, &reply_bytes)?;
        if !reply.questions.contains(question) {
            return Err(DomainError::UpstreamReplyMismatch);
        }

        self.maybe_cache(question, &reply, &reply_bytes);

        let deliveries = guard
            .complete()
            .into_iter()
            .map(|waiter| Delivery {
                client: waiter.client,
                bytes: rewrite_transaction_id(&reply_bytes, waiter.transaction_id),
            })
            .collect();

        Ok(RelayOutcome {
            deliveries,
            ..Default::default()
        })
    }

    fn decode(&self, direction: Direction, raw: &[u8]) -> Result<Message, DomainError> {
        match Message::decode(raw, raw.len()) {
            Ok(message) => {
                self.observer.on_decoded(direction, &message, raw);
                Ok(message)
            }
            Err(error) => {
                self.observer.on_rejected(direction, raw, &error);
                Err(error.into())
            }
        }
    }

    fn maybe_cache(&self, question: &Question, reply: &Message, raw: &Bytes) {
        let Some(cache) = &self.cache else {
            return;
        };
        if reply.header.rcode() != ResponseCode::NoError {
            return;
        }
        if reply.header.truncated() {
            debug!(%question, "Not caching truncated reply");
            return;
        }
        match reply.min_answer_ttl() {
            Some(ttl) if ttl > 0 => cache.insert(question, raw.clone(), ttl),
            _ => {}
        }
    }
}

/// Copy of `reply` carrying `id` as its transaction ID.
pub fn rewrite_transaction_id(reply: &Bytes, id: u16) -> Bytes {
    if reply.len() < 2 || reply[..2] == id.to_be_bytes() {
        return reply.clone();
    }
    let mut out = BytesMut::from(&reply[..]);
    out[..2].copy_from_slice(&id.to_be_bytes());
    out.freeze()
}

/// Copy of a cached reply for one client: carries `id` and the client's own
/// spelling of the question name.
///
/// Entries are shared between queries differing only in name case, so the
/// stored question may be spelled differently from the one asked.
fn answer_from_cache(cached: &Bytes, id: u16, query: &[u8]) -> Bytes {
    let echo_end = match (
        decode_question(query, HEADER_LEN),
        decode_question(cached, HEADER_LEN),
    ) {
        (Ok((asked, asked_end)), Ok((stored, stored_end)))
            if asked_end == stored_end
                && asked.name != stored.name
                && asked.name.eq_ignore_ascii_case(&stored.name) =>
        {
            Some(asked_end)
        }
        _ => None,
    };

    let Some(end) = echo_end else {
        return rewrite_transaction_id(cached, id);
    };
    let mut out = BytesMut::from(&cached[..]);
    out[..2].copy_from_slice(&id.to_be_bytes());
    out[HEADER_LEN..end].copy_from_slice(&query[HEADER_LEN..end]);
    out.freeze()
}
