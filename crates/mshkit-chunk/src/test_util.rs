//! Byte builders shared by the unit tests.

/// Encode a chunk with a correct length field.
pub(crate) fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    chunk_with_length(tag, payload.len() as u32, payload)
}

/// Encode a chunk with an arbitrary length field.
pub(crate) fn chunk_with_length(tag: &[u8; 4], length: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Encode a material list: count prefix followed by the given children.
pub(crate) fn matl(children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = (children.len() as u32).to_le_bytes().to_vec();
    for child in children {
        payload.extend_from_slice(child);
    }
    chunk(b"MATL", &payload)
}
