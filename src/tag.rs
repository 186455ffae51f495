use std::ops::Range;

use minicbor::{Decoder, data::Type};
use openprinttag_ndef::{parser, payload::RecordPayload, writer};

use crate::catalog::Catalogs;
use crate::codec::{DecodeError, EncodeError, RegionCodec};
use crate::layout::{self, TAG_SOFT_CAPACITY};
use crate::material::{AuxRegion, MaterialRecord, MetaRegion};
use crate::transport::{PartialWriteError, TagTransport};

/// Any of the first four keys holding an integer below this marks a map as a
/// meta region: main regions keep UUID-like values under those keys, so a
/// small integer there is (heuristically) an offset table. A main region
/// whose UUID fields are absent and whose GTIN happens to be a small integer
/// would misclassify; inherited behavior, left as is.
const META_VALUE_THRESHOLD: u64 = 1000;

/// Key of the single-entry version marker map that may precede real region
/// data.
const VERSION_MARKER_KEY: u64 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Reserve zero-padded aux space on a tag that has no aux data yet, so
    /// usage counters can later be written without a full rewrite.
    pub reserve_aux: bool,
}

/// Where the regions landed in the tag image, for the partial-write path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionOffsets {
    /// Absolute offset of the CBOR payload within the tag image.
    pub payload_start: usize,

    /// Absolute location of the aux region, when the tag has one.
    pub aux: Option<AuxLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxLocation {
    pub offset: usize,
    pub size: usize,
}

/// Top-level encoder/decoder for whole tag images.
///
/// Constructed once with the loaded catalogs; every call after that is
/// purely functional, so one instance can serve any number of threads.
pub struct TagCodec {
    catalogs: Catalogs,
}

impl TagCodec {
    pub fn new(catalogs: Catalogs) -> Self {
        Self { catalogs }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Encode a record into a complete tag image.
    ///
    /// The meta region is emitted only when the record has aux data or aux
    /// space is reserved; a plain record frames as a single main-region map.
    pub fn encode(
        &self,
        record: &MaterialRecord,
        options: EncodeOptions,
    ) -> Result<Vec<u8>, EncodeError> {
        let codec = RegionCodec::new(&self.catalogs);

        let main_bytes = codec.encode_main(&record.main)?;
        let mut aux_bytes = match &record.aux {
            Some(aux) => codec.encode_aux(aux)?,
            None => Vec::new(),
        };

        let url = record
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty());

        let payload = if aux_bytes.is_empty() && !options.reserve_aux {
            main_bytes
        } else {
            // padding is only added when the aux region starts out empty;
            // real aux data is rewritten in place at its recorded size
            let reserve = options.reserve_aux && aux_bytes.is_empty();
            if aux_bytes.is_empty() {
                aux_bytes.push(0xA0);
            }

            let plan = layout::plan_regions(main_bytes.len(), aux_bytes.len(), reserve, url)?;

            let mut payload = Vec::with_capacity(
                plan.meta_bytes.len() + main_bytes.len() + aux_bytes.len() + plan.padding,
            );
            payload.extend_from_slice(&plan.meta_bytes);
            payload.extend_from_slice(&main_bytes);
            payload.extend_from_slice(&aux_bytes);
            payload.resize(payload.len() + plan.padding, 0);
            payload
        };

        let image = writer::frame_tag_image(&payload, url)?;

        if image.len() > TAG_SOFT_CAPACITY {
            tracing::warn!(
                size = image.len(),
                capacity = TAG_SOFT_CAPACITY,
                "tag image exceeds the format size ceiling"
            );
        }

        Ok(image)
    }

    /// Decode a tag image into a record.
    ///
    /// A readable image without an NDEF message decodes to an all-default
    /// record; malformed framing or CBOR is an error.
    pub fn decode(&self, image: &[u8]) -> Result<MaterialRecord, DecodeError> {
        self.decode_with_offsets(image).map(|(record, _)| record)
    }

    /// Decode and additionally report where the regions sit in the image,
    /// the contract consumed by [`TagCodec::write_aux`].
    pub fn decode_with_offsets(
        &self,
        image: &[u8],
    ) -> Result<(MaterialRecord, RegionOffsets), DecodeError> {
        let codec = RegionCodec::new(&self.catalogs);

        let mut record = MaterialRecord::default();
        let mut offsets = RegionOffsets::default();

        for ndef_record in parser::parse_tag_image(image)? {
            match ndef_record.payload {
                RecordPayload::Cbor(payload) => {
                    let regions = split_regions(&payload)?;

                    record.meta = regions.meta;
                    record.main = codec.decode_main(&payload[regions.main.clone()])?;
                    offsets.payload_start = ndef_record.payload_offset;

                    if let Some(aux_range) = regions.aux {
                        let aux = codec.decode_aux(&payload[aux_range.clone()])?;
                        record.aux = if aux.is_empty() { None } else { Some(aux) };

                        offsets.aux = Some(AuxLocation {
                            offset: ndef_record.payload_offset + aux_range.start,
                            size: aux_range.len(),
                        });
                    }
                }
                RecordPayload::Uri(url) => record.url = Some(url),
                // already logged by the record parser
                RecordPayload::Unknown(_) => {}
            }
        }

        Ok((record, offsets))
    }

    /// Rewrite only the aux region, leaving every main-region byte alone.
    ///
    /// `offsets` must come from a prior [`TagCodec::decode_with_offsets`] of
    /// the same tag; without a real recorded offset the write is refused
    /// rather than guessed.
    pub fn write_aux<T: TagTransport>(
        &self,
        transport: &mut T,
        offsets: RegionOffsets,
        aux: &AuxRegion,
    ) -> Result<(), PartialWriteError> {
        let location = match offsets.aux {
            Some(location) if location.offset > 0 => location,
            _ => return Err(PartialWriteError::MissingAuxOffset),
        };

        let codec = RegionCodec::new(&self.catalogs);
        let bytes = codec.encode_aux(aux)?;

        if bytes.is_empty() {
            return Err(PartialWriteError::EmptyAux);
        }
        if bytes.len() > location.size {
            return Err(PartialWriteError::DoesNotFit {
                needed: bytes.len(),
                available: location.size,
            });
        }

        transport.write_at_offset(location.offset, &bytes)?;
        Ok(())
    }
}

struct Regions {
    meta: Option<MetaRegion>,
    main: Range<usize>,
    aux: Option<Range<usize>>,
}

/// Classify the CBOR payload into its regions.
///
/// Reads the first map, discarding a leading version marker, then decides
/// meta versus main. With a meta region the main and aux slices come from
/// the decoded offsets; without one the first map is the main region and a
/// trailing map, if any, is the aux region.
fn split_regions(payload: &[u8]) -> Result<Regions, DecodeError> {
    let mut cursor = Decoder::new(payload);
    let mut first = item_range(&mut cursor)?;

    if is_version_marker(&payload[first.clone()]) {
        tracing::debug!("skipping version marker map");
        first = item_range(&mut cursor)?;
    }

    if !looks_like_meta(&payload[first.clone()]) {
        let aux = next_map_range(&mut cursor);
        return Ok(Regions {
            meta: None,
            main: first,
            aux,
        });
    }

    let meta = RegionCodec::decode_meta(&payload[first.clone()])?;

    let main_start = meta.main_offset.map(|o| o as usize).unwrap_or(first.end);
    let main_end = match meta.main_size {
        Some(size) => main_start + size as usize,
        None => meta
            .aux_offset
            .map(|o| o as usize)
            .unwrap_or(payload.len()),
    };
    let main = checked_range(main_start, main_end, payload.len())?;

    let aux = match meta.aux_offset {
        Some(offset) => {
            let start = offset as usize;
            let end = match meta.aux_size {
                Some(size) => start + size as usize,
                None => payload.len(),
            };
            Some(checked_range(start, end, payload.len())?)
        }
        None => None,
    };

    Ok(Regions {
        meta: Some(meta),
        main,
        aux,
    })
}

fn item_range(cursor: &mut Decoder<'_>) -> Result<Range<usize>, DecodeError> {
    let start = cursor.position();
    cursor.skip()?;
    Ok(start..cursor.position())
}

fn next_map_range(cursor: &mut Decoder<'_>) -> Option<Range<usize>> {
    if !matches!(cursor.datatype(), Ok(Type::Map)) {
        return None;
    }

    let start = cursor.position();
    cursor.skip().ok()?;
    Some(start..cursor.position())
}

fn checked_range(start: usize, end: usize, payload_len: usize) -> Result<Range<usize>, DecodeError> {
    if start > end || end > payload_len {
        return Err(DecodeError::RegionOutOfBounds {
            start,
            end,
            payload_len,
        });
    }
    Ok(start..end)
}

/// A map with exactly one entry whose key is 2 and whose value is an
/// unsigned integer is a version marker, not region data.
fn is_version_marker(bytes: &[u8]) -> bool {
    let mut d = Decoder::new(bytes);

    if !matches!(d.map(), Ok(Some(1))) {
        return false;
    }

    match d.u64() {
        Ok(VERSION_MARKER_KEY) => {}
        _ => return false,
    }

    matches!(
        d.datatype(),
        Ok(Type::U8 | Type::U16 | Type::U32 | Type::U64)
    )
}

/// Meta-versus-main disambiguation over the shared key space 0–3.
fn looks_like_meta(bytes: &[u8]) -> bool {
    let mut d = Decoder::new(bytes);

    let Ok(Some(len)) = d.map() else {
        return false;
    };

    for _ in 0..len {
        let key = match d.datatype() {
            Ok(Type::U8 | Type::U16 | Type::U32 | Type::U64) => match d.u64() {
                Ok(key) => key,
                Err(_) => return false,
            },
            // a non-integer key means this is no region map at all
            _ => return false,
        };

        let small_int_value = matches!(
            d.datatype(),
            Ok(Type::U8 | Type::U16 | Type::U32 | Type::U64)
        );

        if key <= 3 && small_int_value {
            match d.u64() {
                Ok(value) if value < META_VALUE_THRESHOLD => return true,
                Ok(_) => {}
                Err(_) => return false,
            }
        } else if d.skip().is_err() {
            return false;
        }
    }

    false
}
