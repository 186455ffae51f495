//! Byte layout planning for tags that carry an aux region.
//!
//! The meta region stores the offsets of the main and aux regions, but its
//! own encoded size depends on the magnitude of those offsets (CBOR integers
//! are variable width) while the offsets depend on the meta size. The
//! planner resolves that with one estimate pass and at most one correction
//! pass; it does not iterate to a general fixed point.

use openprinttag_ndef::writer::framing_overhead;

use crate::codec::{EncodeError, RegionCodec};
use crate::material::MetaRegion;

/// Size ceiling the tag format prescribes for a whole image. Exceeding it
/// only warns; small chips simply fail the write at the transport.
pub const TAG_SOFT_CAPACITY: usize = 316;

/// Larger ceiling defined by the format but not consulted anywhere in the
/// encode path.
pub const TAG_HARD_CAPACITY: usize = 504;

/// Encoded meta region plus the padding that follows the aux bytes.
#[derive(Debug)]
pub(crate) struct RegionPlan {
    pub meta: MetaRegion,
    pub meta_bytes: Vec<u8>,
    pub padding: usize,
}

/// Lay out meta, main and aux within one CBOR payload.
///
/// `aux_len` is the length of the already-encoded aux bytes (at least the
/// one-byte empty map when reserving). With `reserve` set, zero padding is
/// added after the aux map so the framed image fills the tag up to
/// [`TAG_SOFT_CAPACITY`], and the recorded aux size covers map plus padding
/// so later rewrites know how much room they have.
pub(crate) fn plan_regions(
    main_len: usize,
    aux_len: usize,
    reserve: bool,
    url: Option<&str>,
) -> Result<RegionPlan, EncodeError> {
    // pass 1: provisional offsets, just to learn the meta region's own size
    let provisional = MetaRegion {
        main_offset: Some(0),
        main_size: Some(main_len as u32),
        aux_offset: Some(main_len as u32),
        aux_size: Some(aux_len as u32),
    };
    let estimate = RegionCodec::encode_meta(&provisional)?;

    // pass 2: real offsets shifted by the meta size
    let mut meta = offsets_for(estimate.len(), main_len, aux_len);
    let mut meta_bytes = RegionCodec::encode_meta(&meta)?;

    // the real offsets may have crossed a CBOR integer width boundary; one
    // correction pass is all the format does
    if meta_bytes.len() != estimate.len() {
        meta = offsets_for(meta_bytes.len(), main_len, aux_len);
        meta_bytes = RegionCodec::encode_meta(&meta)?;
    }

    let mut padding = 0;
    if reserve {
        let payload_len = meta_bytes.len() + main_len + aux_len;
        padding = reservation_padding(payload_len, url);

        if padding > 0 {
            meta.aux_size = Some((aux_len + padding) as u32);
            let repadded = RegionCodec::encode_meta(&meta)?;

            // recording the padded aux size can widen the meta map; shrink
            // the padding by the growth and re-point the offsets once
            let growth = repadded.len().saturating_sub(meta_bytes.len());
            if growth > 0 {
                padding = padding.saturating_sub(growth);
                meta.main_offset = Some(repadded.len() as u32);
                meta.aux_offset = Some((repadded.len() + main_len) as u32);
                meta.aux_size = Some((aux_len + padding) as u32);
                meta_bytes = RegionCodec::encode_meta(&meta)?;
            } else {
                meta_bytes = repadded;
            }
        }
    }

    Ok(RegionPlan {
        meta,
        meta_bytes,
        padding,
    })
}

fn offsets_for(meta_len: usize, main_len: usize, aux_len: usize) -> MetaRegion {
    let main_offset = meta_len as u32;
    MetaRegion {
        main_offset: Some(main_offset),
        main_size: Some(main_len as u32),
        aux_offset: Some(main_offset + main_len as u32),
        aux_size: Some(aux_len as u32),
    }
}

/// Zero bytes needed after the payload to bring the framed image up to the
/// soft capacity. Padding can itself push the TLV length across the
/// extended-length escape, so the framing overhead is measured again once.
fn reservation_padding(payload_len: usize, url: Option<&str>) -> usize {
    let overhead = framing_overhead(payload_len, url);
    let padding = TAG_SOFT_CAPACITY.saturating_sub(overhead + payload_len);

    let padded_overhead = framing_overhead(payload_len + padding, url);
    padding.saturating_sub(padded_overhead - overhead)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_consistent_with_the_encoded_meta() {
        let plan = plan_regions(120, 20, false, None).unwrap();

        assert_eq!(plan.meta.main_offset, Some(plan.meta_bytes.len() as u32));
        assert_eq!(plan.meta.main_size, Some(120));
        assert_eq!(
            plan.meta.aux_offset,
            Some(plan.meta_bytes.len() as u32 + 120)
        );
        assert_eq!(plan.meta.aux_size, Some(20));
        assert_eq!(plan.padding, 0);
    }

    #[test]
    fn offset_invariants_hold() {
        for (main_len, aux_len) in [(5, 1), (30, 12), (120, 25), (250, 40)] {
            let plan = plan_regions(main_len, aux_len, false, None).unwrap();
            let payload_len = plan.meta_bytes.len() + main_len + aux_len;

            let main_offset = plan.meta.main_offset.unwrap();
            let main_size = plan.meta.main_size.unwrap();
            let aux_offset = plan.meta.aux_offset.unwrap();
            let aux_size = plan.meta.aux_size.unwrap();

            assert!(main_offset + main_size <= aux_offset);
            assert!((aux_offset + aux_size) as usize <= payload_len);
        }
    }

    #[test]
    fn reservation_fills_the_image_to_capacity() {
        let plan = plan_regions(80, 1, true, None).unwrap();
        let payload_len = plan.meta_bytes.len() + 80 + 1 + plan.padding;

        assert!(plan.padding > 0);
        assert_eq!(
            payload_len + framing_overhead(payload_len, None),
            TAG_SOFT_CAPACITY
        );

        // the recorded aux size covers the empty map plus its padding
        assert_eq!(plan.meta.aux_size, Some(1 + plan.padding as u32));
    }

    #[test]
    fn reservation_accounts_for_the_uri_record() {
        let url = Some("https://www.example.com/m/1");

        let plain = plan_regions(80, 1, true, None).unwrap();
        let with_url = plan_regions(80, 1, true, url).unwrap();

        assert!(with_url.padding < plain.padding);

        let payload_len = with_url.meta_bytes.len() + 80 + 1 + with_url.padding;
        assert_eq!(
            payload_len + framing_overhead(payload_len, url),
            TAG_SOFT_CAPACITY
        );
    }

    #[test]
    fn oversized_main_region_gets_no_padding() {
        let plan = plan_regions(400, 1, true, None).unwrap();
        assert_eq!(plan.padding, 0);
    }

    #[test]
    fn hard_capacity_is_larger_than_soft() {
        // documented constant only; nothing in the encode path reads it
        assert!(TAG_HARD_CAPACITY > TAG_SOFT_CAPACITY);
    }
}
