//! Minimal, byte-exact PNG encoder.
//!
//! Uses `flate2` for the zlib-compressed IDAT stream and `crc32fast` for
//! chunk checksums rather than pulling in a full PNG-writing crate.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::AtlasError;

const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Encodes an RGBA8 raster as a minimal PNG: signature, IHDR, IDAT, IEND.
///
/// `rgba` must contain exactly `4 * width * height` bytes. Returns
/// [`AtlasError::CompressionFailure`] if the zlib stream can't be
/// finalized — unreachable for the in-memory buffers this crate
/// constructs, but the error is threaded through rather than unwrapped
/// (see DESIGN.md's open-question decision).
pub fn encode(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, AtlasError> {
    debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);

    let mut out = Vec::with_capacity(SIGNATURE.len() + 64 + rgba.len());
    out.extend_from_slice(&SIGNATURE);

    write_chunk(&mut out, b"IHDR", &ihdr_data(width, height));
    write_chunk(&mut out, b"IDAT", &idat_data(width, height, rgba)?);
    write_chunk(&mut out, b"IEND", &[]);

    Ok(out)
}

fn ihdr_data(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.push(8); // bit depth
    data.push(6); // color type: RGBA
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// Builds the raw filtered scanlines (each row prefixed with filter byte
/// `0x00`, None) and zlib-compresses them.
fn idat_data(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, AtlasError> {
    let row_bytes = width as usize * 4;
    let mut raw = Vec::with_capacity((row_bytes + 1) * height as usize);
    for row in rgba.chunks_exact(row_bytes) {
        raw.push(0u8);
        raw.extend_from_slice(row);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&raw)
        .map_err(|e| AtlasError::CompressionFailure(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| AtlasError::CompressionFailure(e.to_string()))
}

/// Frames one chunk as `length | type | data | crc32(type || data)`.
fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    let crc = hasher.finalize();

    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.to_be_bytes());
}
