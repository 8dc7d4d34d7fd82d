/// Assembles wire-format DNS messages for tests.
///
/// Names are written label by label; `pointer` appends a compression pointer
/// instead of a terminating root octet. Section counts are written into the
/// header from the number of entries added unless overridden.
pub struct MessageBuilder {
    id: u16,
    flags: u16,
    counts: [Option<u16>; 4],
    body: Vec<u8>,
    added: [u16; 4],
}

pub const QUESTION: usize = 0;
pub const ANSWER: usize = 1;
pub const AUTHORITY: usize = 2;
pub const ADDITIONAL: usize = 3;

impl MessageBuilder {
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: 0x0100,
            counts: [None; 4],
            body: Vec::new(),
            added: [0; 4],
        }
    }

    pub fn response(id: u16) -> Self {
        Self::query(id).flags(0x8180)
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Forces a header count regardless of what was actually appended.
    pub fn declare(mut self, section: usize, count: u16) -> Self {
        self.counts[section] = Some(count);
        self
    }

    /// Current length of the message, i.e. the offset the next byte lands at.
    pub fn offset(&self) -> usize {
        12 + self.body.len()
    }

    pub fn question(mut self, name: &str, qtype: u16, qclass: u16) -> Self {
        self.body.extend_from_slice(&encode_name(name));
        self.body.extend_from_slice(&qtype.to_be_bytes());
        self.body.extend_from_slice(&qclass.to_be_bytes());
        self.added[QUESTION] += 1;
        self
    }

    pub fn record(mut self, section: usize, owner: &[u8], rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        self.body.extend_from_slice(owner);
        self.body.extend_from_slice(&rtype.to_be_bytes());
        self.body.extend_from_slice(&1u16.to_be_bytes());
        self.body.extend_from_slice(&ttl.to_be_bytes());
        self.body.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        self.body.extend_from_slice(rdata);
        self.added[section] += 1;
        self
    }

    pub fn answer(self, owner: &[u8], rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        self.record(ANSWER, owner, rtype, ttl, rdata)
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.body.len());
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        for section in 0..4 {
            let count = self.counts[section].unwrap_or(self.added[section]);
            out.extend_from_slice(&count.to_be_bytes());
        }
        out.extend_from_slice(&self.body);
        out
    }
}

/// Uncompressed wire form of a dotted name. `""` and `"."` encode the root.
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// Two-octet compression pointer to `offset`.
pub fn pointer(offset: usize) -> [u8; 2] {
    [0xC0 | ((offset >> 8) as u8 & 0x3F), offset as u8]
}

/// Labels followed by a pointer, for partially compressed names.
pub fn labels_then_pointer(labels: &[&str], offset: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for label in labels {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.extend_from_slice(&pointer(offset));
    out
}
