//! Transport module: transport in-memory dan file-backed
//!
//! Prinsip desain:
//! - Lock-Free: pipe antar thread hanya memakai atomic operations
//! - No-Allocation: ring dan mmap region di-alokasi sekali saat init
//! - Terminal state deterministik lewat `StreamState`

mod loopback;
mod mmap_storage;
mod pipe;
mod ring_buffer;

pub use loopback::{Loopback, LoopbackConfig};
pub use mmap_storage::MmapStorage;
pub use pipe::{pipe, PipeReader, PipeWriter};
pub(crate) use ring_buffer::RingBuffer;
