pub mod header;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;
pub mod writer;

/// Capability container header written at the start of every tag image.
pub const CAPABILITY_HEADER: [u8; 4] = [0xE1, 0x40, 0x27, 0x01];

/// TLV tag introducing an NDEF message.
pub const NDEF_MESSAGE_TLV: u8 = 0x03;

/// Single byte NULL TLV, skipped during scanning.
pub const NULL_TLV: u8 = 0x00;

/// TLV terminating the tag image.
pub const TERMINATOR_TLV: u8 = 0xFE;

/// MIME type of the record carrying the CBOR region payload.
pub const MIME_TYPE: &[u8] = b"application/vnd.openprinttag";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdefError {
    #[error("error parsing the NDEF message: {0}")]
    ParsingError(String),

    #[error("tag image is shorter than the capability header")]
    MissingCapabilityHeader,

    #[error("NDEF message of {0} bytes does not fit the extended TLV length")]
    MessageTooLarge(usize),
}
