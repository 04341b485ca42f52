//! mid-proto: kapabilitas byte I/O untuk protocol codec
//!
//! Arsitektur:
//! - `protocol`: trait `Writer` / `Reader`, helper sisi caller, `Message`
//! - `transport`: transport in-memory (loopback, pipe) dan mmap file
//! - `network`: socket lewat `Connection`
//!
//! Codec hanya bergantung pada `protocol`; transport bisa diganti tanpa
//! mengubah codec.

pub mod error;
pub mod network;
pub mod protocol;
pub mod transport;

pub use error::{Error, Result};
pub use protocol::{Message, Reader, Writer};
