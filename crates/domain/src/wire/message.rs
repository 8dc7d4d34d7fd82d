use super::header::Header;
use super::question::{decode_question, Question};
use super::record::{decode_record, ResourceRecord};
use super::HEADER_LEN;
use crate::errors::DecodeError;
use std::fmt;

/// The four record sections, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Question,
    Answer,
    Authority,
    Additional,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Question => "question",
            Section::Answer => "answer",
            Section::Authority => "authority",
            Section::Additional => "additional",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decoded DNS message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    /// Octets consumed by the header and all declared records.
    pub wire_len: usize,
}

impl Message {
    /// Decodes the first `n` bytes of `buffer`.
    ///
    /// `buffer` may be larger than the datagram (a reused receive buffer);
    /// nothing past `n` is ever read. Decoding is all-or-nothing: the first
    /// failing record aborts the whole message.
    pub fn decode(buffer: &[u8], n: usize) -> Result<Self, DecodeError> {
        let buf = &buffer[..n.min(buffer.len())];

        let header = Header::decode(buf)?;
        let mut cursor = HEADER_LEN;

        let mut questions = Vec::with_capacity(usize::from(header.qd_count).min(16));
        for index in 0..header.qd_count {
            ensure_within(buf, cursor, Section::Question, index)?;
            let (question, next) = decode_question(buf, cursor)?;
            questions.push(question);
            cursor = next;
        }

        let answers = decode_section(buf, &mut cursor, Section::Answer, header.an_count)?;
        let authorities = decode_section(buf, &mut cursor, Section::Authority, header.ns_count)?;
        let additionals = decode_section(buf, &mut cursor, Section::Additional, header.ar_count)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
            wire_len: cursor,
        })
    }

    /// Returns the question when the message carries exactly one.
    pub fn single_question(&self) -> Option<&Question> {
        match self.questions.as_slice() {
            [question] => Some(question),
            _ => None,
        }
    }

    pub fn min_answer_ttl(&self) -> Option<u32> {
        self.answers.iter().map(|record| record.ttl).min()
    }

    pub fn records(&self) -> impl Iterator<Item = (Section, &ResourceRecord)> {
        self.answers
            .iter()
            .map(|r| (Section::Answer, r))
            .chain(self.authorities.iter().map(|r| (Section::Authority, r)))
            .chain(self.additionals.iter().map(|r| (Section::Additional, r)))
    }
}

fn ensure_within(
    buf: &[u8],
    cursor: usize,
    section: Section,
    index: u16,
) -> Result<(), DecodeError> {
    if cursor >= buf.len() {
        return Err(DecodeError::SectionOverrun {
            section,
            index,
            offset: cursor,
            available: buf.len(),
        });
    }
    Ok(())
}

fn decode_section(
    buf: &[u8],
    cursor: &mut usize,
    section: Section,
    count: u16,
) -> Result<Vec<ResourceRecord>, DecodeError> {
    let mut records = Vec::with_capacity(usize::from(count).min(32));
    for index in 0..count {
        ensure_within(buf, *cursor, section, index)?;
        let (record, next) = decode_record(buf, *cursor)?;
        records.push(record);
        *cursor = next;
    }
    Ok(records)
}
