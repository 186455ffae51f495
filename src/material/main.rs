use jiff::civil::Date;

/// Material class every fresh record starts with.
pub const DEFAULT_MATERIAL_CLASS: &str = "FFF";

/// The main region: the full material description.
///
/// Every field is optional except `material_class`. Enum-valued fields
/// (`material_class`, `material_type`, `tags`, `certifications`) hold human
/// readable catalog names; the integer codes only exist on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct MainRegion {
    // identity
    pub material_uuid: Option<String>,
    pub package_uuid: Option<String>,
    pub batch_id: Option<String>,
    pub gtin: Option<String>,
    pub brand_name: Option<String>,
    pub material_name: Option<String>,
    pub lot_number: Option<String>,
    pub production_line: Option<String>,
    pub country_of_origin: Option<String>,

    // classification
    pub material_class: String,
    pub material_type: Option<String>,

    // appearance
    pub color_name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub transmittance: Option<u32>,

    // dates
    pub manufactured_date: Option<Date>,
    pub expiration_date: Option<Date>,

    // weights and lengths
    pub nominal_weight: Option<f32>,
    pub container_weight: Option<f32>,
    pub density: Option<f32>,
    pub filament_diameter: Option<f32>,
    pub filament_length: Option<f32>,

    // temperatures
    pub min_print_temperature: Option<i32>,
    pub max_print_temperature: Option<i32>,
    pub min_bed_temperature: Option<i32>,
    pub max_bed_temperature: Option<i32>,
    pub min_chamber_temperature: Option<i32>,
    pub max_chamber_temperature: Option<i32>,
    pub drying_temperature: Option<i32>,
    pub drying_time: Option<u32>,
    pub softening_temperature: Option<i32>,
    pub glass_transition_temperature: Option<i32>,
    pub ironing_temperature: Option<i32>,

    // container geometry
    pub spool_diameter: Option<u32>,
    pub spool_width: Option<u32>,
    pub spool_core_diameter: Option<u32>,
    pub container_volume: Option<f32>,

    // SLA resin
    pub viscosity: Option<f32>,
    pub cure_wavelength: Option<u32>,
    pub cure_time: Option<u32>,
    pub cure_intensity: Option<u32>,
    pub post_cure_time: Option<u32>,
    pub post_cure_temperature: Option<i32>,

    // print parameters
    pub min_print_speed: Option<u32>,
    pub max_print_speed: Option<u32>,
    pub min_nozzle_diameter: Option<f32>,
    pub max_nozzle_diameter: Option<f32>,
    pub min_layer_height: Option<f32>,
    pub max_layer_height: Option<f32>,

    // mechanical and composition
    pub recycled_content: Option<u32>,
    pub moisture_content: Option<f32>,
    pub shore_hardness: Option<u32>,
    pub tensile_strength: Option<f32>,
    pub melt_flow_index: Option<f32>,

    // enum lists
    pub tags: Option<Vec<String>>,
    pub certifications: Option<Vec<String>>,
}

impl Default for MainRegion {
    fn default() -> Self {
        Self {
            material_uuid: None,
            package_uuid: None,
            batch_id: None,
            gtin: None,
            brand_name: None,
            material_name: None,
            lot_number: None,
            production_line: None,
            country_of_origin: None,
            material_class: DEFAULT_MATERIAL_CLASS.to_string(),
            material_type: None,
            color_name: None,
            primary_color: None,
            secondary_color: None,
            transmittance: None,
            manufactured_date: None,
            expiration_date: None,
            nominal_weight: None,
            container_weight: None,
            density: None,
            filament_diameter: None,
            filament_length: None,
            min_print_temperature: None,
            max_print_temperature: None,
            min_bed_temperature: None,
            max_bed_temperature: None,
            min_chamber_temperature: None,
            max_chamber_temperature: None,
            drying_temperature: None,
            drying_time: None,
            softening_temperature: None,
            glass_transition_temperature: None,
            ironing_temperature: None,
            spool_diameter: None,
            spool_width: None,
            spool_core_diameter: None,
            container_volume: None,
            viscosity: None,
            cure_wavelength: None,
            cure_time: None,
            cure_intensity: None,
            post_cure_time: None,
            post_cure_temperature: None,
            min_print_speed: None,
            max_print_speed: None,
            min_nozzle_diameter: None,
            max_nozzle_diameter: None,
            min_layer_height: None,
            max_layer_height: None,
            recycled_content: None,
            moisture_content: None,
            shore_hardness: None,
            tensile_strength: None,
            melt_flow_index: None,
            tags: None,
            certifications: None,
        }
    }
}
