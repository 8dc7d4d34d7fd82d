use dnsrelay_domain::config::EvictionStrategyName;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionStrategy {
    LRU,
    LFU,
}

impl FromStr for EvictionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(Self::LRU),
            "lfu" => Ok(Self::LFU),
            _ => Err(format!("Invalid eviction strategy: {}", s)),
        }
    }
}

impl From<EvictionStrategyName> for EvictionStrategy {
    fn from(name: EvictionStrategyName) -> Self {
        match name {
            EvictionStrategyName::Lru => Self::LRU,
            EvictionStrategyName::Lfu => Self::LFU,
        }
    }
}

impl EvictionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LRU => "lru",
            Self::LFU => "lfu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("LRU".parse::<EvictionStrategy>(), Ok(EvictionStrategy::LRU));
        assert_eq!("lfu".parse::<EvictionStrategy>(), Ok(EvictionStrategy::LFU));
        assert!("arc".parse::<EvictionStrategy>().is_err());
    }

    #[test]
    fn test_from_config_name() {
        assert_eq!(
            EvictionStrategy::from(EvictionStrategyName::Lfu),
            EvictionStrategy::LFU
        );
    }
}
