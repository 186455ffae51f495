use crate::{
    CAPABILITY_HEADER, MIME_TYPE, NDEF_MESSAGE_TLV, NdefError, TERMINATOR_TLV,
    ndef_type::NdefType,
    payload::encode_uri_payload,
};

/// Frame a CBOR region payload, and optionally a URL, into a complete tag
/// image: capability header, NDEF message TLV, record(s), terminator.
///
/// With a URL the message holds two records: a long MIME record carrying the
/// CBOR payload followed by a short well-known URI record. Without one, a
/// single MIME record with both message flags set.
pub fn frame_tag_image(cbor_payload: &[u8], url: Option<&str>) -> Result<Vec<u8>, NdefError> {
    let url = url.map(str::trim).filter(|url| !url.is_empty());

    let mut message = Vec::with_capacity(cbor_payload.len() + 64);
    match url {
        None => push_mime_record(&mut message, cbor_payload, true),
        Some(url) => {
            push_mime_record(&mut message, cbor_payload, false);
            push_uri_record(&mut message, url);
        }
    }

    let mut image = Vec::with_capacity(message.len() + 8);
    image.extend_from_slice(&CAPABILITY_HEADER);
    image.push(NDEF_MESSAGE_TLV);
    push_tlv_length(&mut image, message.len())?;
    image.extend_from_slice(&message);
    image.push(TERMINATOR_TLV);

    Ok(image)
}

/// Number of framing bytes a payload of `payload_len` picks up, for the
/// single or dual record layout. Needed up front by the caller when it sizes
/// aux reservation padding against the tag capacity.
pub fn framing_overhead(payload_len: usize, url: Option<&str>) -> usize {
    let url = url.map(str::trim).filter(|url| !url.is_empty());

    // long record: header byte, type length, 4 byte payload length, type
    let mime_record = 1 + 1 + 4 + MIME_TYPE.len();

    // short record: header byte, type length, payload length, type "U"
    let uri_record = match url {
        Some(url) => 1 + 1 + 1 + 1 + encode_uri_payload(url).len(),
        None => 0,
    };

    let message_len = mime_record + payload_len + uri_record;
    let tlv_length_bytes = if message_len < 0xFF { 1 } else { 3 };

    CAPABILITY_HEADER.len() + 1 + tlv_length_bytes + mime_record + uri_record + 1
}

fn record_header_byte(begin: bool, end: bool, short_record: bool, tnf: NdefType) -> u8 {
    let mut header = tnf.bits();
    if begin {
        header |= 0b1000_0000;
    }
    if end {
        header |= 0b0100_0000;
    }
    if short_record {
        header |= 0b0001_0000;
    }
    header
}

fn push_mime_record(message: &mut Vec<u8>, cbor_payload: &[u8], message_end: bool) {
    message.push(record_header_byte(true, message_end, false, NdefType::Mime));
    message.push(MIME_TYPE.len() as u8);
    message.extend_from_slice(&(cbor_payload.len() as u32).to_be_bytes());
    message.extend_from_slice(MIME_TYPE);
    message.extend_from_slice(cbor_payload);
}

fn push_uri_record(message: &mut Vec<u8>, url: &str) {
    let payload = encode_uri_payload(url);

    message.push(record_header_byte(false, true, true, NdefType::WellKnown));
    message.push(1);
    message.push(payload.len() as u8);
    message.push(b'U');
    message.extend_from_slice(&payload);
}

fn push_tlv_length(image: &mut Vec<u8>, length: usize) -> Result<(), NdefError> {
    if length < 0xFF {
        image.push(length as u8);
        return Ok(());
    }

    let extended =
        u16::try_from(length).map_err(|_| NdefError::MessageTooLarge(length))?;

    image.push(0xFF);
    image.extend_from_slice(&extended.to_be_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_tag_image;
    use crate::payload::RecordPayload;

    #[test]
    fn image_starts_with_capability_header() {
        let image = frame_tag_image(&[0xA0], None).unwrap();
        assert_eq!(image[0], 0xE1);
        assert_eq!(image[1], 0x40);
        assert_eq!(image[2], 0x27);
        assert_eq!(image[3], 0x01);
        assert_eq!(*image.last().unwrap(), TERMINATOR_TLV);
    }

    #[test]
    fn single_record_round_trip() {
        let payload = vec![0xA1, 0x06, 0x00];
        let image = frame_tag_image(&payload, None).unwrap();

        let records = parse_tag_image(&image).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload, RecordPayload::Cbor(payload));
        assert!(records[0].header.message_begin);
        assert!(records[0].header.message_end);
    }

    #[test]
    fn dual_record_round_trip() {
        let payload = vec![0xA1, 0x06, 0x00];
        let image = frame_tag_image(&payload, Some("https://www.example.com")).unwrap();

        let records = parse_tag_image(&image).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload, RecordPayload::Cbor(payload));
        assert!(records[0].header.message_begin);
        assert!(!records[0].header.message_end);

        assert_eq!(
            records[1].payload,
            RecordPayload::Uri("https://www.example.com".into())
        );
        assert!(!records[1].header.message_begin);
        assert!(records[1].header.message_end);
        assert!(records[1].header.short_record);
    }

    #[test]
    fn dual_record_is_larger_than_single() {
        let payload = vec![0xA1, 0x06, 0x00];
        let single = frame_tag_image(&payload, None).unwrap();
        let dual = frame_tag_image(&payload, Some("https://example.com")).unwrap();

        assert!(dual.len() > single.len());
    }

    #[test]
    fn blank_url_frames_a_single_record() {
        let payload = vec![0xA0];
        let single = frame_tag_image(&payload, None).unwrap();
        let blank = frame_tag_image(&payload, Some("   ")).unwrap();

        assert_eq!(single, blank);
    }

    #[test]
    fn extended_length_escape_round_trips() {
        let payload = vec![0x42; 400];
        let image = frame_tag_image(&payload, None).unwrap();

        // TLV length must use the 0xFF escape
        assert_eq!(image[4], NDEF_MESSAGE_TLV);
        assert_eq!(image[5], 0xFF);

        let records = parse_tag_image(&image).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload, RecordPayload::Cbor(payload));
    }

    #[test]
    fn framing_overhead_matches_built_frames() {
        for (payload_len, url) in [
            (1_usize, None),
            (80, None),
            (150, Some("https://www.example.com")),
            // the message length crosses the 0xFF TLV escape at 221 bytes
            (220, None),
            (221, None),
            (222, None),
            (400, Some("https://example.com/m/1")),
        ] {
            let payload = vec![0xA0; payload_len];
            let image = frame_tag_image(&payload, url).unwrap();
            assert_eq!(
                image.len(),
                payload_len + framing_overhead(payload_len, url),
                "payload_len={payload_len} url={url:?}"
            );
        }
    }

    #[test]
    fn determinism() {
        let payload = vec![0xA1, 0x00, 0x18, 0x2A];
        let a = frame_tag_image(&payload, Some("https://example.com")).unwrap();
        let b = frame_tag_image(&payload, Some("https://example.com")).unwrap();
        assert_eq!(a, b);
    }
}
