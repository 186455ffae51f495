use crate::{header::NdefHeader, payload::RecordPayload};

/// A single parsed NDEF record.
///
/// `payload_offset` is the byte position of the payload within the full tag
/// image. Callers use it to address the CBOR regions for partial rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: RecordPayload,
    pub payload_offset: usize,
}
