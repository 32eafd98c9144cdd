#![doc = include_str!("../README.md")]

#[cfg(feature = "deserialize")]
pub mod de;

mod data;
pub use data::*;
