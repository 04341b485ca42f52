//! Kontrak untuk pesan yang bisa di-encode ke `Writer`
//!
//! Layout pesan ditentukan oleh implementor; trait ini tidak mendefinisikan
//! framing.

use crate::error::Result;

use super::Writer;

pub trait Message {
    /// Nama pesan, untuk dispatch dan diagnostik
    fn message_name(&self) -> &'static str;

    /// Encode pesan ke transport apa pun
    fn encode(&self, w: &mut dyn Writer) -> Result<()>;

    /// Decode dari buffer, returns jumlah byte yang dikonsumsi
    fn decode(&mut self, buf: &[u8]) -> Result<usize>;
}
