//! Network Layer: socket sebagai transport `Writer` / `Reader`
//!
//! `Connection` membungkus stream std; mio dipakai untuk koneksi
//! non-blocking yang di-drive oleh event loop milik caller. Pada mode
//! non-blocking, "belum ada data" menjadi `Error::WouldBlock`.

mod connection;

use std::net::SocketAddr;

pub use connection::{Connection, ConnectionConfig};

use crate::error::{Error, Result};

/// Connection di atas socket mio (selalu non-blocking)
pub type MioConnection = Connection<mio::net::TcpStream>;

/// Mulai koneksi TCP non-blocking.
///
/// Koneksi belum tentu selesai saat fungsi ini return; tunggu event
/// `Interest::WRITABLE` dari `mio::Poll` sebelum menulis.
pub fn connect_nonblocking(addr: SocketAddr) -> Result<MioConnection> {
    let stream = mio::net::TcpStream::connect(addr).map_err(Error::Io)?;
    stream.set_nodelay(true).map_err(Error::Io)?;
    tracing::debug!(%addr, "non-blocking connect started");
    Ok(Connection::new(stream))
}
