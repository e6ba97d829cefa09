#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod args;
mod callback;
mod encoding;
mod error;
mod http;
mod mint;

#[cfg(feature = "mocks")]
pub mod mocks;

pub use args::*;
pub use callback::*;
pub use encoding::*;
pub use error::*;
pub use http::*;
pub use mint::*;

pub use primitive_types::U256;
