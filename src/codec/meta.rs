//! Static key table for the meta region, keys 0–3.
//!
//! Offsets are relative to the start of the CBOR payload, not the tag image.

use crate::material::MetaRegion;

use super::value::{WireFields, WireValue};

pub(super) fn to_wire(meta: &MetaRegion) -> Vec<(u8, WireValue)> {
    let mut fields = WireFields::new();

    fields.push_uint(0, meta.main_offset);
    fields.push_uint(1, meta.main_size);
    fields.push_uint(2, meta.aux_offset);
    fields.push_uint(3, meta.aux_size);

    fields.into_pairs()
}

pub(super) fn apply_field(region: &mut MetaRegion, key: u64, value: WireValue) {
    match key {
        0 => region.main_offset = value.into_u32(),
        1 => region.main_size = value.into_u32(),
        2 => region.aux_offset = value.into_u32(),
        3 => region.aux_size = value.into_u32(),
        _ => tracing::debug!(key, "skipping unknown meta region key"),
    }
}
