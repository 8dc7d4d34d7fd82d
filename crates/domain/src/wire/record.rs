use super::name::decode_name;
use super::reader::{read_bytes, read_u16, read_u32};
use crate::dns_record::{RecordClass, RecordType};
use crate::errors::DecodeError;

/// A resource record from the answer, authority or additional section.
///
/// `rdata` is kept opaque. Interpreting it is left to [`super::RDataRegistry`],
/// which needs `rdata_offset` to resolve compression pointers against the
/// whole message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub rclass: u16,
    /// Seconds the record may be cached; 0 means do not cache.
    pub ttl: u32,
    pub rdlength: u16,
    pub rdata: Vec<u8>,
    /// Absolute offset of `rdata` in the message it was decoded from.
    pub rdata_offset: usize,
}

impl ResourceRecord {
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_code(self.rtype)
    }

    pub fn record_class(&self) -> Option<RecordClass> {
        RecordClass::from_code(self.rclass)
    }

    /// End of the RDATA region, exclusive.
    pub fn rdata_end(&self) -> usize {
        self.rdata_offset + usize::from(self.rdlength)
    }
}

/// Decodes one resource record at `offset`, returning it with the cursor
/// just past its RDATA.
pub fn decode_record(buf: &[u8], offset: usize) -> Result<(ResourceRecord, usize), DecodeError> {
    let (name, consumed) = decode_name(buf, offset)?;
    let mut cursor = offset + consumed;

    let rtype = read_u16(buf, cursor)?;
    cursor += 2;

    let rclass = read_u16(buf, cursor)?;
    cursor += 2;

    let ttl = read_u32(buf, cursor)?;
    cursor += 4;

    let rdlength = read_u16(buf, cursor)?;
    cursor += 2;

    let rdata = read_bytes(buf, cursor, usize::from(rdlength)).map_err(|_| {
        DecodeError::TruncatedRecord {
            offset: cursor,
            rdlength: usize::from(rdlength),
            available: buf.len().saturating_sub(cursor),
        }
    })?;
    let rdata_offset = cursor;
    cursor += rdata.len();

    Ok((
        ResourceRecord {
            name,
            rtype,
            rclass,
            ttl,
            rdlength,
            rdata: rdata.to_vec(),
            rdata_offset,
        },
        cursor,
    ))
}
