//! Static key table for the aux region, keys 0–3.

use crate::material::AuxRegion;

use super::value::{WireFields, WireValue};

pub(super) fn to_wire(aux: &AuxRegion) -> Vec<(u8, WireValue)> {
    let mut fields = WireFields::new();

    fields.push_float(0, aux.consumed_weight);
    fields.push_text(1, aux.workgroup.as_deref());
    fields.push_text(2, aux.user_note.as_deref());
    fields.push_date(3, aux.last_stir_time);

    fields.into_pairs()
}

pub(super) fn apply_field(region: &mut AuxRegion, key: u64, value: WireValue) {
    match key {
        0 => region.consumed_weight = value.into_f32(),
        1 => region.workgroup = value.into_text(),
        2 => region.user_note = value.into_text(),
        3 => region.last_stir_time = value.into_date(),
        _ => tracing::debug!(key, "skipping unknown aux region key"),
    }
}
