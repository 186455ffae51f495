use winnow::Bytes;

/// The record parser always sees a complete tag image, so a plain byte
/// stream is enough; there is no partial-read resumption at this layer.
pub type Stream<'i> = &'i Bytes;

pub fn new(b: &[u8]) -> Stream<'_> {
    Bytes::new(b)
}
