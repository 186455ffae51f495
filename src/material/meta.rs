/// The meta region: byte offsets and sizes of the main and aux regions,
/// relative to the start of the CBOR payload (not the tag image).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetaRegion {
    pub main_offset: Option<u32>,
    pub main_size: Option<u32>,
    pub aux_offset: Option<u32>,
    pub aux_size: Option<u32>,
}
