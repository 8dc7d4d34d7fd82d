//! Per-type interpretation of RDATA.
//!
//! The record decoder leaves RDATA opaque. Callers that need structured data
//! look the record up in an [`RDataRegistry`], which maps `(type, class)` to an
//! [`RDataDecoder`]. New record types are supported by registering another
//! decoder; the core decoder does not change.
use super::name::decode_name;
use super::reader::{read_u16, read_u32};
use super::record::ResourceRecord;
use crate::dns_record::{RecordClass, RecordType};
use crate::errors::DecodeError;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(String),
    Cname(String),
    Ptr(String),
    Mx {
        preference: u16,
        exchange: String,
    },
    Soa {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Txt(Vec<Vec<u8>>),
    /// RDATA with no registered decoder.
    Opaque(Vec<u8>),
}

/// Decodes the RDATA of one record.
///
/// `message` is the whole datagram the record came from, so names embedded in
/// RDATA can follow compression pointers to anywhere earlier in the message.
pub trait RDataDecoder: Send + Sync {
    fn decode(&self, message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError>;
}

impl<F> RDataDecoder for F
where
    F: Fn(&[u8], &ResourceRecord) -> Result<RData, DecodeError> + Send + Sync,
{
    fn decode(&self, message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
        self(message, record)
    }
}

#[derive(Clone, Default)]
pub struct RDataRegistry {
    decoders: HashMap<(u16, u16), Arc<dyn RDataDecoder>>,
}

impl RDataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with decoders for the common class IN types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let class = RecordClass::IN;
        registry.register(RecordType::A, class, decode_a);
        registry.register(RecordType::AAAA, class, decode_aaaa);
        registry.register(RecordType::NS, class, |m: &[u8], r: &ResourceRecord| {
            decode_single_name(m, r).map(RData::Ns)
        });
        registry.register(RecordType::CNAME, class, |m: &[u8], r: &ResourceRecord| {
            decode_single_name(m, r).map(RData::Cname)
        });
        registry.register(RecordType::PTR, class, |m: &[u8], r: &ResourceRecord| {
            decode_single_name(m, r).map(RData::Ptr)
        });
        registry.register(RecordType::MX, class, decode_mx);
        registry.register(RecordType::SOA, class, decode_soa);
        registry.register(RecordType::TXT, class, decode_txt);
        registry
    }

    pub fn register<D>(&mut self, rtype: RecordType, class: RecordClass, decoder: D)
    where
        D: RDataDecoder + 'static,
    {
        self.register_code(rtype.code(), class.code(), decoder);
    }

    /// Registers a decoder for a raw `(type, class)` pair, for codes
    /// [`RecordType`] does not name.
    pub fn register_code<D>(&mut self, rtype: u16, rclass: u16, decoder: D)
    where
        D: RDataDecoder + 'static,
    {
        self.decoders.insert((rtype, rclass), Arc::new(decoder));
    }

    pub fn supports(&self, rtype: u16, rclass: u16) -> bool {
        self.decoders.contains_key(&(rtype, rclass))
    }

    pub fn decode(&self, message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
        match self.decoders.get(&(record.rtype, record.rclass)) {
            Some(decoder) => decoder.decode(message, record),
            None => Ok(RData::Opaque(record.rdata.clone())),
        }
    }
}

impl std::fmt::Debug for RDataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.decoders.keys().collect();
        keys.sort();
        f.debug_struct("RDataRegistry").field("decoders", &keys).finish()
    }
}

fn truncated(record: &ResourceRecord) -> DecodeError {
    DecodeError::TruncatedRecord {
        offset: record.rdata_offset,
        rdlength: usize::from(record.rdlength),
        available: record.rdata.len(),
    }
}

/// Reads a name at `offset` inside `record`'s RDATA, resolving pointers
/// against the whole message. Returns the name and the offset after it.
fn name_in_rdata(
    message: &[u8],
    record: &ResourceRecord,
    offset: usize,
) -> Result<(String, usize), DecodeError> {
    let (name, consumed) = decode_name(message, offset)?;
    let end = offset + consumed;
    if end > record.rdata_end() {
        return Err(truncated(record));
    }
    Ok((name, end))
}

fn fixed_u16(message: &[u8], record: &ResourceRecord, offset: usize) -> Result<u16, DecodeError> {
    if offset + 2 > record.rdata_end() {
        return Err(truncated(record));
    }
    read_u16(message, offset)
}

fn fixed_u32(message: &[u8], record: &ResourceRecord, offset: usize) -> Result<u32, DecodeError> {
    if offset + 4 > record.rdata_end() {
        return Err(truncated(record));
    }
    read_u32(message, offset)
}

fn decode_a(_message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
    let octets: [u8; 4] = record
        .rdata
        .as_slice()
        .try_into()
        .map_err(|_| truncated(record))?;
    Ok(RData::A(Ipv4Addr::from(octets)))
}

fn decode_aaaa(_message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
    let octets: [u8; 16] = record
        .rdata
        .as_slice()
        .try_into()
        .map_err(|_| truncated(record))?;
    Ok(RData::Aaaa(Ipv6Addr::from(octets)))
}

fn decode_single_name(message: &[u8], record: &ResourceRecord) -> Result<String, DecodeError> {
    name_in_rdata(message, record, record.rdata_offset).map(|(name, _)| name)
}

fn decode_mx(message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
    let preference = fixed_u16(message, record, record.rdata_offset)?;
    let (exchange, _) = name_in_rdata(message, record, record.rdata_offset + 2)?;
    Ok(RData::Mx {
        preference,
        exchange,
    })
}

fn decode_soa(message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
    let (mname, cursor) = name_in_rdata(message, record, record.rdata_offset)?;
    let (rname, cursor) = name_in_rdata(message, record, cursor)?;
    Ok(RData::Soa {
        mname,
        rname,
        serial: fixed_u32(message, record, cursor)?,
        refresh: fixed_u32(message, record, cursor + 4)?,
        retry: fixed_u32(message, record, cursor + 8)?,
        expire: fixed_u32(message, record, cursor + 12)?,
        minimum: fixed_u32(message, record, cursor + 16)?,
    })
}

fn decode_txt(_message: &[u8], record: &ResourceRecord) -> Result<RData, DecodeError> {
    let mut strings = Vec::new();
    let mut rest = record.rdata.as_slice();
    while let Some((&len, tail)) = rest.split_first() {
        let len = usize::from(len);
        if tail.len() < len {
            return Err(truncated(record));
        }
        strings.push(tail[..len].to_vec());
        rest = &tail[len..];
    }
    Ok(RData::Txt(strings))
}
