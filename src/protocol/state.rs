//! Terminal-state latch untuk transport konkret
//!
//! Sekali end-of-stream atau failure dilaporkan, call berikutnya harus
//! melaporkan kondisi yang sama. Tidak boleh kembali ke sukses.

use std::io;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Open,
    /// Tidak ada byte lagi untuk dibaca
    EndOfStream,
    /// Fault pertama yang terjadi, disimpan sebagai kind
    Failed(io::ErrorKind),
}

impl StreamState {
    #[inline(always)]
    pub fn is_open(&self) -> bool {
        matches!(self, StreamState::Open)
    }

    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }

    /// Gate untuk `read`.
    ///
    /// `Ok(true)` jika read boleh lanjut, `Ok(false)` jika stream sudah
    /// selesai (caller harus mengembalikan `Ok(0)`), `Err` jika failed.
    #[inline(always)]
    pub fn check_read(&self) -> Result<bool, Error> {
        match *self {
            StreamState::Open => Ok(true),
            StreamState::EndOfStream => Ok(false),
            StreamState::Failed(kind) => Err(Error::Failed(kind)),
        }
    }

    /// Gate untuk `write`. End-of-stream di sisi baca tidak menghalangi write.
    #[inline(always)]
    pub fn check_write(&self) -> Result<(), Error> {
        match *self {
            StreamState::Failed(kind) => Err(Error::Failed(kind)),
            _ => Ok(()),
        }
    }

    /// Latch end-of-stream. Failure tetap menang.
    #[inline]
    pub fn mark_eof(&mut self) {
        if self.is_open() {
            tracing::trace!("stream reached end-of-stream");
            *self = StreamState::EndOfStream;
        }
    }

    /// Latch failure dan kembalikan error untuk call saat ini.
    ///
    /// Kondisi sementara (`WouldBlock`) dan error argumen tidak di-latch.
    pub fn fail(&mut self, err: Error) -> Error {
        match err {
            Error::WouldBlock
            | Error::InvalidArgument(_)
            | Error::NegativeLength
            | Error::Failed(_) => err,
            _ => {
                if !matches!(self, StreamState::Failed(_)) {
                    tracing::debug!(error = %err, "stream failed");
                    *self = StreamState::Failed(err.kind());
                }
                err
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_is_sticky() {
        let mut state = StreamState::Open;
        state.mark_eof();
        assert!(!state.check_read().unwrap());
        assert!(!state.check_read().unwrap());
        assert!(state.check_write().is_ok());
    }

    #[test]
    fn test_failure_wins_over_eof() {
        let mut state = StreamState::Open;
        let err = state.fail(Error::Io(io::Error::from(io::ErrorKind::ConnectionReset)));
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);

        state.mark_eof();
        assert!(matches!(
            state.check_read(),
            Err(Error::Failed(io::ErrorKind::ConnectionReset))
        ));
        assert!(state.check_write().is_err());
    }

    #[test]
    fn test_would_block_not_latched() {
        let mut state = StreamState::Open;
        let err = state.fail(Error::WouldBlock);
        assert!(err.is_would_block());
        assert!(state.is_open());
    }
}
