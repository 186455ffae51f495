mod aux;
mod main;
mod meta;

pub use aux::AuxRegion;
pub use main::{DEFAULT_MATERIAL_CLASS, MainRegion};
pub use meta::MetaRegion;

/// Root aggregate for one tag read or write.
///
/// Produced by [`crate::tag::TagCodec::decode`] and consumed by
/// [`crate::tag::TagCodec::encode`]; has no lifecycle of its own beyond a
/// single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialRecord {
    /// Offset table, present only on tags written with an aux region.
    pub meta: Option<MetaRegion>,

    /// The material description itself.
    pub main: MainRegion,

    /// Mutable usage sub-record, absent until first written.
    pub aux: Option<AuxRegion>,

    /// URL carried in a trailing URI record.
    pub url: Option<String>,
}
