//! Error kinds for the atlas generation pipeline.
//!
//! Most of these are handled inside the orchestrator rather than
//! propagated to the caller. The enum exists so the cases that do
//! terminate a request have a typed shape to log and match on.

use thiserror::Error;

/// Everything that can go wrong while generating an atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The font resolver produced no usable face for the requested name/path.
    #[error("could not resolve font {name:?}")]
    FontUnresolved {
        /// The font identifier or path that failed to resolve.
        name: String,
    },

    /// A single code point could not be rasterized by the font face.
    ///
    /// Non-fatal: the orchestrator skips the code point and continues.
    #[error("glyph load failed for U+{cp:04X}")]
    GlyphLoadFailed {
        /// The code point that failed to rasterize.
        cp: u32,
    },

    /// Even at the 8192x8192 cap, not every glyph could be packed.
    ///
    /// Non-fatal: the orchestrator returns whatever was placed before the
    /// cap was hit (see DESIGN.md's open-question decision).
    #[error("packing overflow at {side}x{side}, {placed}/{requested} glyphs placed")]
    PackingOverflow {
        /// The bin side length at which packing gave up.
        side: u32,
        /// Number of glyphs successfully placed.
        placed: usize,
        /// Number of glyphs that were attempted.
        requested: usize,
    },

    /// The PNG IDAT compression step failed.
    #[error("PNG compression failed: {0}")]
    CompressionFailure(String),

    /// The transport layer received a frame it could not decode.
    #[error("transport payload malformed: {0}")]
    TransportDecodeError(String),
}
