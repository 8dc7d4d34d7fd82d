use super::name::decode_name;
use super::reader::read_u16;
use crate::dns_record::{RecordClass, RecordType};
use crate::errors::DecodeError;
use std::fmt;

/// One entry of the question section.
///
/// `name` is canonical, so two structurally identical questions compare and
/// hash equal. That makes `Question` usable directly as a registry or cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: impl Into<String>, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_code(self.qtype)
    }

    pub fn record_class(&self) -> Option<RecordClass> {
        RecordClass::from_code(self.qclass)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() { "." } else { &self.name };
        match self.record_type() {
            Some(rt) => write!(f, "{} {}", name, rt)?,
            None => write!(f, "{} TYPE{}", name, self.qtype)?,
        }
        match self.record_class() {
            Some(class) => write!(f, " {}", class),
            None => write!(f, " CLASS{}", self.qclass),
        }
    }
}

/// Decodes one question at `offset`, returning it with the cursor just past it.
pub fn decode_question(buf: &[u8], offset: usize) -> Result<(Question, usize), DecodeError> {
    let (name, consumed) = decode_name(buf, offset)?;
    let mut cursor = offset + consumed;

    let qtype = read_u16(buf, cursor)?;
    cursor += 2;

    let qclass = read_u16(buf, cursor)?;
    cursor += 2;

    Ok((
        Question {
            name,
            qtype,
            qclass,
        },
        cursor,
    ))
}
