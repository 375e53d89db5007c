//! Header probing for binary PNM files (P5 greyscale, P6 RGB).
//!
//! Only these formats store rows as raw, uncompressed bytes at a fixed
//! offset, which is what banded decoding of huge sources needs.

/// Where raw pixel rows live inside a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawLayout {
    pub width: u32,
    pub height: u32,
    /// 1 for greyscale, 3 for RGB.
    pub channels: usize,
    /// Byte offset of the first pixel row.
    pub data_offset: usize,
}

impl RawLayout {
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Total bytes of pixel data the header promises.
    pub fn data_len(&self) -> usize {
        self.row_stride() * self.height as usize
    }
}

/// Parse a binary 8-bit PNM header. Returns `None` for anything else,
/// including 16-bit PNM and ASCII variants.
pub fn probe_raw_layout(buf: &[u8]) -> Option<RawLayout> {
    if buf.len() < 2 || buf[0] != b'P' {
        return None;
    }
    let channels = match buf[1] {
        b'5' => 1,
        b'6' => 3,
        _ => return None,
    };

    let mut pos = 2;
    let width = next_number(buf, &mut pos)?;
    let height = next_number(buf, &mut pos)?;
    let maxval = next_number(buf, &mut pos)?;
    if width == 0 || height == 0 || maxval == 0 || maxval > 255 {
        return None;
    }
    // Exactly one whitespace byte separates the header from the raster.
    if !buf.get(pos)?.is_ascii_whitespace() {
        return None;
    }

    Some(RawLayout {
        width,
        height,
        channels,
        data_offset: pos + 1,
    })
}

fn next_number(buf: &[u8], pos: &mut usize) -> Option<u32> {
    // Skip whitespace and comments.
    loop {
        let b = *buf.get(*pos)?;
        if b.is_ascii_whitespace() {
            *pos += 1;
        } else if b == b'#' {
            while *buf.get(*pos)? != b'\n' {
                *pos += 1;
            }
        } else {
            break;
        }
    }

    let start = *pos;
    while buf.get(*pos).is_some_and(|b| b.is_ascii_digit()) {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    std::str::from_utf8(&buf[start..*pos]).ok()?.parse().ok()
}
