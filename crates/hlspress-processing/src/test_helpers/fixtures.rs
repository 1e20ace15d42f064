//! Byte-level fixtures for container tests.

/// Build a single MP4 box with a 32-bit size header.
pub fn mp4_box(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let size = (8 + payload.len()) as u32;
    let mut data = Vec::with_capacity(size as usize);
    data.extend_from_slice(&size.to_be_bytes());
    data.extend_from_slice(box_type);
    data.extend_from_slice(payload);
    data
}

/// Minimal structurally valid MP4 (ftyp + moov + mdat).
pub fn valid_mp4() -> Vec<u8> {
    let mut data = mp4_box(b"ftyp", b"isom\x00\x00\x02\x00isomiso2mp41");
    data.extend(mp4_box(b"moov", b"stub movie header"));
    data.extend(mp4_box(b"mdat", b"stub media payload"));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_layout() {
        let b = mp4_box(b"ftyp", b"isom");
        assert_eq!(b.len(), 12);
        assert_eq!(&b[0..4], &[0x00, 0x00, 0x00, 0x0c]);
        assert_eq!(&b[4..8], b"ftyp");
    }
}
