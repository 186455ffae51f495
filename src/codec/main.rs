//! Static key table for the main region.
//!
//! The wire form is a single integer-keyed CBOR map, keys 0–58. Keys 12, 25
//! and 26 are retired: never written, skipped when read back from old tags.

use crate::catalog::Catalogs;
use crate::material::MainRegion;

use super::value::{WireFields, WireValue};

pub(super) fn to_wire(main: &MainRegion, catalogs: &Catalogs) -> Vec<(u8, WireValue)> {
    let mut fields = WireFields::new();

    fields.push_hex(0, main.material_uuid.as_deref());
    fields.push_hex(1, main.package_uuid.as_deref());
    fields.push_text(2, main.batch_id.as_deref());
    fields.push_numeric_text(3, main.gtin.as_deref());
    fields.push_text(4, main.brand_name.as_deref());
    fields.push_text(5, main.material_name.as_deref());
    fields.push_enum(6, Some(main.material_class.as_str()), &catalogs.material_class);
    fields.push_enum(7, main.material_type.as_deref(), &catalogs.material_type);
    fields.push_text(8, main.color_name.as_deref());
    fields.push_hex(9, main.primary_color.as_deref());
    fields.push_hex(10, main.secondary_color.as_deref());
    fields.push_uint(11, main.transmittance);
    fields.push_date(13, main.manufactured_date);
    fields.push_date(14, main.expiration_date);
    fields.push_float(15, main.nominal_weight);
    fields.push_float(16, main.container_weight);
    fields.push_float(17, main.density);
    fields.push_float(18, main.filament_diameter);
    fields.push_float(19, main.filament_length);
    fields.push_int(20, main.min_print_temperature);
    fields.push_int(21, main.max_print_temperature);
    fields.push_int(22, main.min_bed_temperature);
    fields.push_int(23, main.max_bed_temperature);
    fields.push_int(24, main.min_chamber_temperature);
    fields.push_int(27, main.max_chamber_temperature);
    fields.push_int(28, main.drying_temperature);
    fields.push_uint(29, main.drying_time);
    fields.push_int(30, main.softening_temperature);
    fields.push_uint(31, main.spool_diameter);
    fields.push_uint(32, main.spool_width);
    fields.push_uint(33, main.spool_core_diameter);
    fields.push_float(34, main.container_volume);
    fields.push_float(35, main.viscosity);
    fields.push_uint(36, main.cure_wavelength);
    fields.push_uint(37, main.cure_time);
    fields.push_uint(38, main.cure_intensity);
    fields.push_enum_list(39, main.tags.as_deref(), &catalogs.tags);
    fields.push_enum_list(40, main.certifications.as_deref(), &catalogs.certifications);
    fields.push_uint(41, main.min_print_speed);
    fields.push_uint(42, main.max_print_speed);
    fields.push_text(43, main.lot_number.as_deref());
    fields.push_text(44, main.production_line.as_deref());
    fields.push_text(45, main.country_of_origin.as_deref());
    fields.push_uint(46, main.recycled_content);
    fields.push_float(47, main.moisture_content);
    fields.push_uint(48, main.shore_hardness);
    fields.push_float(49, main.tensile_strength);
    fields.push_int(50, main.glass_transition_temperature);
    fields.push_float(51, main.melt_flow_index);
    fields.push_float(52, main.min_nozzle_diameter);
    fields.push_float(53, main.max_nozzle_diameter);
    fields.push_float(54, main.min_layer_height);
    fields.push_float(55, main.max_layer_height);
    fields.push_uint(56, main.post_cure_time);
    fields.push_int(57, main.post_cure_temperature);
    fields.push_int(58, main.ironing_temperature);

    fields.into_pairs()
}

pub(super) fn apply_field(
    region: &mut MainRegion,
    key: u64,
    value: WireValue,
    catalogs: &Catalogs,
) {
    match key {
        0 => region.material_uuid = value.into_hex_text(),
        1 => region.package_uuid = value.into_hex_text(),
        2 => region.batch_id = value.into_text(),
        3 => region.gtin = value.into_text(),
        4 => region.brand_name = value.into_text(),
        5 => region.material_name = value.into_text(),
        6 => {
            if let Some(class) = value.into_code(&catalogs.material_class) {
                region.material_class = class;
            }
        }
        7 => region.material_type = value.into_code(&catalogs.material_type),
        8 => region.color_name = value.into_text(),
        9 => region.primary_color = value.into_hex_text(),
        10 => region.secondary_color = value.into_hex_text(),
        11 => region.transmittance = value.into_u32(),
        13 => region.manufactured_date = value.into_date(),
        14 => region.expiration_date = value.into_date(),
        15 => region.nominal_weight = value.into_f32(),
        16 => region.container_weight = value.into_f32(),
        17 => region.density = value.into_f32(),
        18 => region.filament_diameter = value.into_f32(),
        19 => region.filament_length = value.into_f32(),
        20 => region.min_print_temperature = value.into_i32(),
        21 => region.max_print_temperature = value.into_i32(),
        22 => region.min_bed_temperature = value.into_i32(),
        23 => region.max_bed_temperature = value.into_i32(),
        24 => region.min_chamber_temperature = value.into_i32(),
        27 => region.max_chamber_temperature = value.into_i32(),
        28 => region.drying_temperature = value.into_i32(),
        29 => region.drying_time = value.into_u32(),
        30 => region.softening_temperature = value.into_i32(),
        31 => region.spool_diameter = value.into_u32(),
        32 => region.spool_width = value.into_u32(),
        33 => region.spool_core_diameter = value.into_u32(),
        34 => region.container_volume = value.into_f32(),
        35 => region.viscosity = value.into_f32(),
        36 => region.cure_wavelength = value.into_u32(),
        37 => region.cure_time = value.into_u32(),
        38 => region.cure_intensity = value.into_u32(),
        39 => region.tags = value.into_code_list(&catalogs.tags),
        40 => region.certifications = value.into_code_list(&catalogs.certifications),
        41 => region.min_print_speed = value.into_u32(),
        42 => region.max_print_speed = value.into_u32(),
        43 => region.lot_number = value.into_text(),
        44 => region.production_line = value.into_text(),
        45 => region.country_of_origin = value.into_text(),
        46 => region.recycled_content = value.into_u32(),
        47 => region.moisture_content = value.into_f32(),
        48 => region.shore_hardness = value.into_u32(),
        49 => region.tensile_strength = value.into_f32(),
        50 => region.glass_transition_temperature = value.into_i32(),
        51 => region.melt_flow_index = value.into_f32(),
        52 => region.min_nozzle_diameter = value.into_f32(),
        53 => region.max_nozzle_diameter = value.into_f32(),
        54 => region.min_layer_height = value.into_f32(),
        55 => region.max_layer_height = value.into_f32(),
        56 => region.post_cure_time = value.into_u32(),
        57 => region.post_cure_temperature = value.into_i32(),
        58 => region.ironing_temperature = value.into_i32(),
        12 | 25 | 26 => tracing::debug!(key, "skipping retired main region key"),
        _ => tracing::debug!(key, "skipping unknown main region key"),
    }
}
