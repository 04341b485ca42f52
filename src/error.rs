//! Error type untuk semua operasi Writer/Reader
//!
//! Satu enum, satu alias `Result`. Tidak ada panic untuk kondisi transport:
//! setiap kegagalan dikembalikan ke caller pada call yang mengalaminya.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Fault dari OS / transport di bawahnya
    #[error("transport fault: {0}")]
    Io(#[source] io::Error),

    /// Fault yang sudah di-latch sebelumnya, dilaporkan ulang
    #[error("transport previously failed: {0:?}")]
    Failed(io::ErrorKind),

    /// Transport non-blocking belum bisa memindahkan byte apa pun
    #[error("operation would block")]
    WouldBlock,

    #[error("transport closed")]
    Closed,

    /// Destination dengan kapasitas tetap sudah penuh
    #[error("destination exhausted")]
    Exhausted,

    #[error("end of stream")]
    EndOfStream,

    #[error("transport accepted zero bytes")]
    WriteZero,

    #[error("negative length")]
    NegativeLength,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl Error {
    /// `io::ErrorKind` padanan, untuk interop dengan std
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Error::Io(e) => e.kind(),
            Error::Failed(kind) => *kind,
            Error::WouldBlock => io::ErrorKind::WouldBlock,
            Error::Closed => io::ErrorKind::BrokenPipe,
            Error::EndOfStream => io::ErrorKind::UnexpectedEof,
            Error::Exhausted | Error::WriteZero => io::ErrorKind::WriteZero,
            Error::NegativeLength | Error::InvalidArgument(_) => io::ErrorKind::InvalidInput,
        }
    }

    /// Kondisi sementara yang boleh di-retry oleh caller
    #[inline]
    pub fn is_would_block(&self) -> bool {
        matches!(self, Error::WouldBlock)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::WouldBlock => Error::WouldBlock,
            io::ErrorKind::UnexpectedEof => Error::EndOfStream,
            io::ErrorKind::WriteZero => Error::WriteZero,
            _ => Error::Io(e),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(inner) => inner,
            other => io::Error::new(other.kind(), other),
        }
    }
}
