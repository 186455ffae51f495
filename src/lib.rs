pub mod catalog;
pub mod codec;
pub mod layout;
pub mod material;
pub mod tag;
pub mod transport;

pub use catalog::{Catalogs, EnumTable};
pub use codec::{DecodeError, EncodeError, RegionCodec};
pub use layout::{TAG_HARD_CAPACITY, TAG_SOFT_CAPACITY};
pub use material::{AuxRegion, MainRegion, MaterialRecord, MetaRegion};
pub use tag::{AuxLocation, EncodeOptions, RegionOffsets, TagCodec};
pub use transport::{PartialWriteError, TagTransport, TransportError};
