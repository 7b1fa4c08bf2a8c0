//! EXIF orientation extraction from JPEG byte streams.
//!
//! The JPEG marker walk is done by hand so that only the APP1 segment is
//! handed to the EXIF parser; anything that is not a well-formed JPEG yields
//! "unknown", which callers treat as identity. Orientation is best-effort.

use ::exif::{In, Reader, Tag};

use super::{ExifTransform, Orientation};

const SOI: u16 = 0xFFD8;
const APP1: u16 = 0xFFE1;
const EXIF_HEADER: &[u8] = b"Exif";

/// Read the raw EXIF orientation code from JPEG bytes.
///
/// Returns `None` for non-JPEG input, a JPEG without EXIF, or an EXIF block
/// without the orientation tag.
pub fn read_orientation_code(bytes: &[u8]) -> Option<u32> {
    if read_u16(bytes, 0)? != SOI {
        return None;
    }

    let mut offset = 2;
    while offset < bytes.len() {
        if read_u16(bytes, offset + 2)? <= 8 {
            return None;
        }
        let marker = read_u16(bytes, offset)?;
        offset += 2;

        if marker == APP1 {
            let length = read_u16(bytes, offset)? as usize;
            let end = (offset + length).min(bytes.len());
            let payload = bytes.get(offset + 2..end)?;
            return orientation_from_app1(payload);
        } else if marker & 0xFF00 != 0xFF00 {
            break;
        } else {
            offset += read_u16(bytes, offset)? as usize;
        }
    }

    None
}

/// Read the EXIF orientation from JPEG bytes and map it to a transform.
pub fn read_exif_transform(bytes: &[u8]) -> ExifTransform {
    ExifTransform::from_code(read_orientation_code(bytes))
}

/// Read the EXIF orientation as a typed value, `None` when unknown.
pub fn read_orientation(bytes: &[u8]) -> Option<Orientation> {
    read_orientation_code(bytes).and_then(Orientation::from_exif)
}

/// Parse the APP1 payload: "Exif\0\0" followed by a TIFF block.
fn orientation_from_app1(payload: &[u8]) -> Option<u32> {
    if !payload.starts_with(EXIF_HEADER) {
        return None;
    }
    let tiff = payload.get(EXIF_HEADER.len() + 2..)?;

    let exif = Reader::new().read_raw(tiff.to_vec()).ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;
    field.value.get_uint(0)
}

#[inline]
fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let pair = bytes.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([pair[0], pair[1]]))
}
