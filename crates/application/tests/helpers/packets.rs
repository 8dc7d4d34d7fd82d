fn push_name(out: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
}

fn header(id: u16, flags: u16, qd: u16, an: u16) -> Vec<u8> {
    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&flags.to_be_bytes());
    out.extend_from_slice(&qd.to_be_bytes());
    out.extend_from_slice(&an.to_be_bytes());
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

/// Recursion-desired query for `name` with a single question.
pub fn query(id: u16, name: &str, qtype: u16) -> Vec<u8> {
    let mut out = header(id, 0x0100, 1, 0);
    push_name(&mut out, name);
    out.extend_from_slice(&qtype.to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    out
}

/// Query carrying two questions.
pub fn two_question_query(id: u16, first: &str, second: &str) -> Vec<u8> {
    let mut out = header(id, 0x0100, 2, 0);
    for name in [first, second] {
        push_name(&mut out, name);
        out.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    }
    out
}

/// Reply to `query(id, name, 1)` with one A record per TTL, each pointing
/// back at the question name.
pub fn a_reply(id: u16, name: &str, rcode: u8, ttls: &[u32]) -> Vec<u8> {
    let mut out = header(id, 0x8180 | u16::from(rcode), 1, ttls.len() as u16);
    push_name(&mut out, name);
    out.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    for (i, ttl) in ttls.iter().enumerate() {
        out.extend_from_slice(&[0xC0, 12, 0x00, 0x01, 0x00, 0x01]);
        out.extend_from_slice(&ttl.to_be_bytes());
        out.extend_from_slice(&[0x00, 0x04, 192, 0, 2, i as u8 + 1]);
    }
    out
}

pub fn transaction_id(datagram: &[u8]) -> u16 {
    u16::from_be_bytes([datagram[0], datagram[1]])
}
