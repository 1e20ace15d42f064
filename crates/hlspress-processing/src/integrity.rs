//! MP4 container integrity checking.
//!
//! Validates container framing only: the top-level box chain must account
//! for exactly the file's length, start with `ftyp`, and include a `moov`.
//! Codec-level correctness is out of scope; a file that passes here can
//! still fail to transcode, and the segmenter will report that.

/// Minimum size of a box header: 32-bit size + fourcc.
const BOX_HEADER_LEN: usize = 8;

/// Check whether `data` is a structurally valid MP4 container.
pub fn is_valid_mp4(data: &[u8]) -> bool {
    if data.len() < BOX_HEADER_LEN {
        return false;
    }

    let mut offset: usize = 0;
    let mut first = true;
    let mut seen_moov = false;

    while offset < data.len() {
        if data.len() - offset < BOX_HEADER_LEN {
            return false;
        }

        let size32 = u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as u64;
        let box_type = &data[offset + 4..offset + 8];

        if !box_type
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b' ')
        {
            return false;
        }

        if first {
            if box_type != b"ftyp" {
                return false;
            }
            first = false;
        }

        if box_type == b"moov" {
            seen_moov = true;
        }

        let box_size = match size32 {
            // size == 0: box extends to end of file, must be the last box
            0 => (data.len() - offset) as u64,
            // size == 1: 64-bit largesize follows the fourcc
            1 => {
                if data.len() - offset < 16 {
                    return false;
                }
                let largesize = u64::from_be_bytes([
                    data[offset + 8],
                    data[offset + 9],
                    data[offset + 10],
                    data[offset + 11],
                    data[offset + 12],
                    data[offset + 13],
                    data[offset + 14],
                    data[offset + 15],
                ]);
                if largesize < 16 {
                    return false;
                }
                largesize
            }
            s if s < BOX_HEADER_LEN as u64 => return false,
            s => s,
        };

        let end = match (offset as u64).checked_add(box_size) {
            Some(end) if end <= data.len() as u64 => end as usize,
            _ => return false,
        };

        offset = end;
    }

    seen_moov
}
