mod aux;
mod main;
mod meta;
pub(crate) mod value;

use std::convert::Infallible;

use minicbor::{Decoder, Encoder, data::Type};

use crate::catalog::Catalogs;
use crate::material::{AuxRegion, MainRegion, MetaRegion};

use value::WireValue;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("CBOR encoding failed: {0}")]
    Cbor(#[from] minicbor::encode::Error<Infallible>),

    #[error(transparent)]
    Frame(#[from] openprinttag_ndef::NdefError),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("CBOR decoding failed: {0}")]
    Cbor(#[from] minicbor::decode::Error),

    #[error(transparent)]
    Ndef(#[from] openprinttag_ndef::NdefError),

    #[error("region at {start}..{end} lies outside the {payload_len} byte payload")]
    RegionOutOfBounds {
        start: usize,
        end: usize,
        payload_len: usize,
    },
}

/// Encodes and decodes the CBOR byte content of the three regions.
///
/// Purely functional over the injected catalogs; holds no other state.
pub struct RegionCodec<'a> {
    catalogs: &'a Catalogs,
}

impl<'a> RegionCodec<'a> {
    pub fn new(catalogs: &'a Catalogs) -> Self {
        Self { catalogs }
    }

    pub fn encode_main(&self, main: &MainRegion) -> Result<Vec<u8>, EncodeError> {
        encode_wire_map(&main::to_wire(main, self.catalogs))
    }

    pub fn decode_main(&self, bytes: &[u8]) -> Result<MainRegion, DecodeError> {
        let mut region = MainRegion::default();
        for (key, value) in decode_wire_map(bytes)? {
            main::apply_field(&mut region, key, value, self.catalogs);
        }
        Ok(region)
    }

    /// Encode the aux region. An aux region with nothing to say encodes to
    /// zero bytes; the caller omits the region from the tag entirely.
    pub fn encode_aux(&self, aux: &AuxRegion) -> Result<Vec<u8>, EncodeError> {
        let pairs = aux::to_wire(aux);
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        encode_wire_map(&pairs)
    }

    pub fn decode_aux(&self, bytes: &[u8]) -> Result<AuxRegion, DecodeError> {
        let mut region = AuxRegion::default();
        for (key, value) in decode_wire_map(bytes)? {
            aux::apply_field(&mut region, key, value);
        }
        Ok(region)
    }

    pub fn encode_meta(meta: &MetaRegion) -> Result<Vec<u8>, EncodeError> {
        encode_wire_map(&meta::to_wire(meta))
    }

    pub fn decode_meta(bytes: &[u8]) -> Result<MetaRegion, DecodeError> {
        let mut region = MetaRegion::default();
        for (key, value) in decode_wire_map(bytes)? {
            meta::apply_field(&mut region, key, value);
        }
        Ok(region)
    }
}

fn encode_wire_map(pairs: &[(u8, WireValue)]) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    let mut encoder = Encoder::new(&mut buf);

    encoder.map(pairs.len() as u64)?;
    for (key, value) in pairs {
        encoder.u8(*key)?;
        value::encode_value(&mut encoder, value)?;
    }

    Ok(buf)
}

/// Read one definite-length CBOR map into key/value pairs. Bytes after the
/// map are ignored; reserved aux space is zero-padded past the map on
/// purpose.
fn decode_wire_map(bytes: &[u8]) -> Result<Vec<(u64, WireValue)>, DecodeError> {
    let mut decoder = Decoder::new(bytes);

    let Some(len) = decoder.map()? else {
        return Err(minicbor::decode::Error::message("indefinite-length region map").into());
    };

    let mut pairs = Vec::with_capacity(len as usize);
    for _ in 0..len {
        let key = match decoder.datatype()? {
            Type::U8 | Type::U16 | Type::U32 | Type::U64 => decoder.u64()?,
            _ => {
                // region keys are small unsigned integers; foreign entries
                // are stepped over, not fatal
                decoder.skip()?;
                decoder.skip()?;
                continue;
            }
        };

        if let Some(value) = value::read_value(&mut decoder)? {
            pairs.push((key, value));
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnumTable;

    fn catalogs() -> Catalogs {
        Catalogs {
            material_class: EnumTable::new([("FFF", 1), ("SLA", 2)]),
            material_type: EnumTable::new([("PLA", 1), ("PETG", 2), ("ABS", 3)]),
            tags: EnumTable::new([("matte", 1), ("silk", 2), ("glow", 5)]),
            certifications: EnumTable::new([("RoHS", 1), ("REACH", 2)]),
        }
    }

    #[test]
    fn default_main_region_encodes_only_the_class() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let bytes = codec.encode_main(&MainRegion::default()).unwrap();
        // {6: 1}
        assert_eq!(bytes, vec![0xA1, 0x06, 0x01]);
    }

    #[test]
    fn main_region_round_trip() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let mut main = MainRegion::default();
        main.material_uuid = Some("123E4567E89B12D3A456426614174000".into());
        main.gtin = Some("8594173675001".into());
        main.brand_name = Some("Prusament".into());
        main.material_name = Some("PLA Prusa Galaxy Black".into());
        main.material_type = Some("PLA".into());
        main.primary_color = Some("8A2BE2".into());
        main.manufactured_date = Some(jiff::civil::date(2025, 3, 14));
        main.nominal_weight = Some(1000.0);
        main.filament_diameter = Some(1.75);
        main.min_print_temperature = Some(205);
        main.max_print_temperature = Some(225);
        main.spool_diameter = Some(200);
        main.tags = Some(vec!["matte".into(), "glow".into()]);
        main.certifications = Some(vec!["RoHS".into()]);

        let bytes = codec.encode_main(&main).unwrap();
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded, main);
    }

    #[test]
    fn encode_is_deterministic() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let mut main = MainRegion::default();
        main.brand_name = Some("Prusament".into());
        main.tags = Some(vec!["matte".into(), "silk".into()]);
        main.max_print_temperature = Some(225);

        let first = codec.encode_main(&main).unwrap();
        let second = codec.encode_main(&main).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn blank_fields_stay_off_the_wire() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let mut main = MainRegion::default();
        main.brand_name = Some("   ".into());
        main.batch_id = Some(String::new());

        let bytes = codec.encode_main(&main).unwrap();
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.brand_name, None);
        assert_eq!(decoded.batch_id, None);
    }

    #[test]
    fn unmapped_enum_names_are_dropped_on_encode() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let mut main = MainRegion::default();
        main.material_type = Some("choose a type…".into());
        main.tags = Some(vec!["matte".into(), "no-such-tag".into()]);

        let decoded = codec.decode_main(&codec.encode_main(&main).unwrap()).unwrap();

        assert_eq!(decoded.material_type, None);
        assert_eq!(decoded.tags, Some(vec!["matte".to_string()]));
    }

    #[test]
    fn fully_unmapped_enum_list_omits_the_key() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let mut main = MainRegion::default();
        main.certifications = Some(vec!["no-such-cert".into()]);

        let decoded = codec.decode_main(&codec.encode_main(&main).unwrap()).unwrap();
        assert_eq!(decoded.certifications, None);
    }

    #[test]
    fn unknown_tag_code_survives_decoding() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        // {39: [1, 42]}
        let bytes = vec![0xA1, 0x18, 0x27, 0x82, 0x01, 0x18, 0x2A];
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.tags, Some(vec!["matte".to_string(), "42".to_string()]));
    }

    #[test]
    fn unknown_class_code_survives_decoding() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        // {6: 99}
        let bytes = vec![0xA1, 0x06, 0x18, 0x63];
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.material_class, "99");
    }

    #[test]
    fn decimal_string_coerces_to_temperature() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        // {20: "205"}
        let bytes = vec![0xA1, 0x14, 0x63, b'2', b'0', b'5'];
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.min_print_temperature, Some(205));
    }

    #[test]
    fn byte_string_uuid_becomes_uppercase_hex() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        // {0: h'DEADBEEF'}
        let bytes = vec![0xA1, 0x00, 0x44, 0xDE, 0xAD, 0xBE, 0xEF];
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.material_uuid, Some("DEADBEEF".to_string()));
    }

    #[test]
    fn retired_keys_are_tolerated() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        // {12: 7, 25: 60, 26: 70, 21: 225}
        let bytes = vec![
            0xA4, 0x0C, 0x07, 0x18, 0x19, 0x18, 0x3C, 0x18, 0x1A, 0x18, 0x46, 0x15, 0x18, 0xE1,
        ];
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.max_print_temperature, Some(225));
    }

    #[test]
    fn malformed_cbor_is_an_error() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        // map header claiming two entries, but the payload stops short
        assert!(codec.decode_main(&[0xA2, 0x00]).is_err());
        assert!(codec.decode_main(&[0x83, 0x01]).is_err());
    }

    #[test]
    fn empty_aux_region_encodes_to_nothing() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        assert!(codec.encode_aux(&AuxRegion::default()).unwrap().is_empty());

        let blank = AuxRegion {
            workgroup: Some("  ".into()),
            ..AuxRegion::default()
        };
        assert!(codec.encode_aux(&blank).unwrap().is_empty());
    }

    #[test]
    fn aux_region_round_trip() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let aux = AuxRegion {
            consumed_weight: Some(250.5),
            workgroup: Some("lab-3".into()),
            user_note: Some("opened on tuesday".into()),
            last_stir_time: Some(jiff::civil::date(2025, 6, 1)),
        };

        let bytes = codec.encode_aux(&aux).unwrap();
        let decoded = codec.decode_aux(&bytes).unwrap();

        assert_eq!(decoded, aux);
    }

    #[test]
    fn aux_decode_ignores_reservation_padding() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let aux = AuxRegion {
            consumed_weight: Some(100.0),
            ..AuxRegion::default()
        };

        let mut bytes = codec.encode_aux(&aux).unwrap();
        bytes.extend_from_slice(&[0x00; 40]);

        assert_eq!(codec.decode_aux(&bytes).unwrap(), aux);
    }

    #[test]
    fn meta_region_round_trip() {
        let meta = MetaRegion {
            main_offset: Some(13),
            main_size: Some(120),
            aux_offset: Some(133),
            aux_size: Some(60),
        };

        let bytes = RegionCodec::encode_meta(&meta).unwrap();
        let decoded = RegionCodec::decode_meta(&bytes).unwrap();

        assert_eq!(decoded, meta);
    }

    #[test]
    fn date_round_trips_through_epoch_seconds() {
        let catalogs = catalogs();
        let codec = RegionCodec::new(&catalogs);

        let mut main = MainRegion::default();
        main.expiration_date = Some(jiff::civil::date(2027, 12, 31));

        let bytes = codec.encode_main(&main).unwrap();
        let decoded = codec.decode_main(&bytes).unwrap();

        assert_eq!(decoded.expiration_date, main.expiration_date);
    }
}
