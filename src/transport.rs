use crate::codec::EncodeError;

/// Byte-level contract implemented by the physical tag transport.
///
/// The codec never drives the radio itself: it produces byte ranges and the
/// transport turns them into page reads and writes for a concrete chip
/// family. Retries, timeouts and cancellation all live behind this trait.
pub trait TagTransport {
    /// Read the inclusive page range as one contiguous byte run.
    fn read_pages(&mut self, start_page: u8, end_page: u8) -> Result<Vec<u8>, TransportError>;

    fn write_page(&mut self, page: u8, bytes: [u8; 4]) -> Result<(), TransportError>;

    /// Write at an arbitrary byte offset. Implementations read-modify-write
    /// the edge pages when the offset or length is not page aligned.
    fn write_at_offset(&mut self, offset: usize, bytes: &[u8]) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum PartialWriteError {
    /// No aux offset was recorded when the tag was read; writing blind would
    /// clobber the main region, so the write is refused.
    #[error("no aux region offset was recorded for this tag")]
    MissingAuxOffset,

    #[error("aux region is empty, nothing to write")]
    EmptyAux,

    #[error("aux region needs {needed} bytes but only {available} are reserved")]
    DoesNotFit { needed: usize, available: usize },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
