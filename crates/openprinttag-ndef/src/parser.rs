pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8, be_u16,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    MIME_TYPE, NDEF_MESSAGE_TLV, NULL_TLV, NdefError, TERMINATOR_TLV,
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{RecordPayload, decode_uri_payload},
    record::NdefRecord,
};

/// Parse a complete tag image: capability header, TLV framing, then the NDEF
/// records of the first NDEF message TLV.
///
/// A well-formed image without an NDEF message (capability header followed by
/// a terminator) yields an empty record list. Truncated or malformed framing
/// is an error.
pub fn parse_tag_image(image: &[u8]) -> Result<Vec<NdefRecord>, NdefError> {
    let input = &mut stream::new(image);
    let image_len = image.len();

    // the capability header is skipped, not validated, so that legacy images
    // with a different capability byte still parse
    take(4_usize)
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| NdefError::MissingCapabilityHeader)?;

    let message_length = loop {
        let Ok(tag) = next_byte(input) else {
            // image ended without a message TLV
            return Ok(Vec::new());
        };

        match tag {
            NULL_TLV => continue,
            TERMINATOR_TLV => return Ok(Vec::new()),
            NDEF_MESSAGE_TLV => {
                break parse_tlv_length(input)
                    .map_err(|e| NdefError::ParsingError(format!("message length: {e}")))?;
            }
            other => {
                // unknown TLV, skip its value
                let length = parse_tlv_length(input)
                    .map_err(|e| NdefError::ParsingError(format!("TLV 0x{other:02X}: {e}")))?;

                take(length)
                    .parse_next(input)
                    .map_err(|e: ErrMode<ContextError>| {
                        NdefError::ParsingError(format!("TLV 0x{other:02X}: {e}"))
                    })?;
            }
        }
    };

    parse_ndef_records(input, image_len, message_length)
}

/// Parse records until `message_length` bytes are consumed or a terminator
/// TLV shows up early.
pub fn parse_ndef_records(
    input: &mut Stream<'_>,
    image_len: usize,
    message_length: usize,
) -> Result<Vec<NdefRecord>, NdefError> {
    let mut records = Vec::new();
    let mut total_parsed_bytes = 0;

    while total_parsed_bytes < message_length {
        if input.first() == Some(&TERMINATOR_TLV) {
            break;
        }

        let input_start_bytes = input.len();
        let record = parse_ndef_record(input, image_len)
            .map_err(|e| NdefError::ParsingError(format!("record: {e}")))?;

        total_parsed_bytes += input_start_bytes - input.len();
        records.push(record);
    }

    Ok(records)
}

/// Parse one NDEF record and classify its payload.
///
/// `image_len` is the total image size the stream started with, used to
/// compute the absolute offset of the record payload.
pub fn parse_ndef_record(input: &mut Stream<'_>, image_len: usize) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;

    let payload_offset = image_len - input.len();
    let payload = parse_payload(input, &header, &type_)?;

    Ok(NdefRecord {
        header,
        type_,
        id,
        payload,
        payload_offset,
    })
}

fn next_byte(input: &mut Stream<'_>) -> ModalResult<u8> {
    be_u8.parse_next(input)
}

fn parse_tlv_length(input: &mut Stream<'_>) -> ModalResult<usize> {
    let length_indicator = be_u8.parse_next(input)?;

    if length_indicator == 0xFF {
        let extended = be_u16.parse_next(input)?;
        Ok(extended as usize)
    } else {
        Ok(length_indicator as usize)
    }
}

fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_name_format = NdefType::from_bits(type_name_format);
    let type_length = be_u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format,
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize)
            .map(|s: &[u8]| Some(s.to_vec()))
            .parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(
    input: &mut Stream<'_>,
    header: &NdefHeader,
    type_: &[u8],
) -> ModalResult<RecordPayload> {
    let bytes = take(header.payload_length as usize).parse_next(input)?;

    if type_ == MIME_TYPE {
        return Ok(RecordPayload::Cbor(bytes.to_vec()));
    }

    if header.type_name_format == NdefType::WellKnown && type_ == b"U" {
        return Ok(RecordPayload::Uri(decode_uri_payload(bytes)));
    }

    tracing::warn!(
        type_ = %String::from_utf8_lossy(type_),
        payload = %hex::encode(bytes),
        "skipping NDEF record of unknown type"
    );

    Ok(RecordPayload::Unknown(type_.to_vec()))
}
