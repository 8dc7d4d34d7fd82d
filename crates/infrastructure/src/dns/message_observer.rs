use dnsrelay_application::ports::{Direction, MessageObserver};
use dnsrelay_domain::{DecodeError, Message};
use std::fmt::Write;
use tracing::{debug, enabled, trace, warn, Level};

/// Reports decode results as `tracing` events.
///
/// Decoded messages are logged at debug level and rejected datagrams at
/// warn level. With `dump_packets`, the raw bytes are also dumped as hex at
/// trace level.
pub struct TracingMessageObserver {
    dump_packets: bool,
}

impl TracingMessageObserver {
    pub fn new(dump_packets: bool) -> Self {
        Self { dump_packets }
    }

    fn dump(&self, direction: Direction, raw: &[u8]) {
        if self.dump_packets && enabled!(Level::TRACE) {
            trace!(%direction, len = raw.len(), hex = %hex_dump(raw), "Packet dump");
        }
    }
}

impl MessageObserver for TracingMessageObserver {
    fn on_decoded(&self, direction: Direction, message: &Message, raw: &[u8]) {
        let header = &message.header;
        let question = message
            .questions
            .first()
            .map(|q| q.to_string())
            .unwrap_or_default();

        debug!(
            %direction,
            id = header.id,
            flags = format_args!("{:#06x}", header.flags),
            opcode = header.opcode(),
            aa = header.authoritative(),
            tc = header.truncated(),
            rd = header.recursion_desired(),
            ra = header.recursion_available(),
            rcode = %header.rcode(),
            qd_count = header.qd_count,
            an_count = header.an_count,
            ns_count = header.ns_count,
            ar_count = header.ar_count,
            question = %question,
            bytes = raw.len(),
            "DNS message decoded"
        );
        self.dump(direction, raw);
    }

    fn on_rejected(&self, direction: Direction, raw: &[u8], error: &DecodeError) {
        warn!(%direction, bytes = raw.len(), error = %error, "Dropping malformed DNS message");
        self.dump(direction, raw);
    }
}

/// Lowercase hex, 16 octets per line, each line prefixed with its offset.
pub fn hex_dump(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len() * 3 + raw.len() / 16 * 6);
    for (line, chunk) in raw.chunks(16).enumerate() {
        if line > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:04x}:", line * 16);
        for byte in chunk {
            let _ = write!(out, " {:02x}", byte);
        }
    }
    out
}
