#![allow(dead_code)]
pub mod wire_builder;

pub use wire_builder::*;
