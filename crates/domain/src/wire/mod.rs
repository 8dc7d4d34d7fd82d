//! RFC 1035 message decoding.
//!
//! Decoding is a pure function of `(buffer, offset)`: no state is kept between
//! calls and the input is never modified, so the same buffer can be forwarded
//! verbatim after it has been inspected.
pub mod header;
pub mod message;
pub mod name;
pub mod question;
pub mod rdata;
pub mod reader;
pub mod record;

pub use header::{Header, ResponseCode};
pub use message::{Message, Section};
pub use name::decode_name;
pub use question::{decode_question, Question};
pub use rdata::{RData, RDataDecoder, RDataRegistry};
pub use record::{decode_record, ResourceRecord};

/// Size of the fixed message header.
pub const HEADER_LEN: usize = 12;

/// Largest datagram a classic (non-EDNS) UDP exchange carries.
pub const MAX_UDP_MESSAGE_LEN: usize = 512;

/// Upper bound on the uncompressed wire length of a domain name.
pub const MAX_NAME_LEN: usize = 255;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 128;
