#![allow(dead_code)]
pub mod mock_ports;
pub mod packets;

pub use mock_ports::*;
pub use packets::*;
