use compact_str::CompactString;
use dnsrelay_domain::Question;

/// Cache key for one question. Names compare case-insensitively, so the
/// owner name is stored lowercased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub name: CompactString,
    pub qtype: u16,
    pub qclass: u16,
}

impl CacheKey {
    #[inline]
    pub fn new(name: &str, qtype: u16, qclass: u16) -> Self {
        let name = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            CompactString::from(name.to_ascii_lowercase())
        } else {
            CompactString::from(name)
        };
        Self { name, qtype, qclass }
    }
}

impl From<&Question> for CacheKey {
    fn from(question: &Question) -> Self {
        Self::new(&question.name, question.qtype, question.qclass)
    }
}
