//! The per-request parameter record, also the crate's configuration
//! surface: a `Default` impl supplying sensible defaults, plus chained
//! `with_*` builder methods for callers who construct one in code rather
//! than decoding it off the wire.

use serde::{Deserialize, Serialize};

/// Growth discipline requested for auto-packing (the wire-format `packMode` field).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackMode {
    Pot,
    Aligned,
}

impl From<PackMode> for crate::sizer::PackMode {
    fn from(value: PackMode) -> Self {
        match value {
            PackMode::Pot => crate::sizer::PackMode::Pot,
            PackMode::Aligned => crate::sizer::PackMode::Aligned,
        }
    }
}

/// Immutable parameters for one atlas generation request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtlasRequest {
    /// UTF-8 source of code points.
    pub text: String,
    /// Path or logical font name.
    pub font: String,
    /// Pixel size.
    pub size: u32,
    /// Initial bin side (both dimensions).
    pub width: u32,
    /// Reserved margin counted in the BMFont `padding=` field.
    pub padding: u32,
    /// Inter-glyph slack.
    pub spacing: u32,
    /// Enables sizing + growth.
    pub auto_pack: bool,
    /// Growth discipline when `auto_pack` is enabled.
    pub pack_mode: PackMode,
    /// Extra margin reserved around each glyph, included in the BMFont
    /// rect but not blitted.
    pub effect_padding: u32,
    /// Added to every glyph's `xadvance`.
    pub global_x_advance: i32,
    /// Added to every glyph's `xoffset`.
    pub global_x_offset: i32,
    /// Added to every glyph's `yoffset`.
    pub global_y_offset: i32,
}

impl Default for AtlasRequest {
    fn default() -> Self {
        Self {
            text: "ABC".to_string(),
            font: "Arial".to_string(),
            size: 48,
            width: 512,
            padding: 2,
            spacing: 2,
            auto_pack: false,
            pack_mode: PackMode::Pot,
            effect_padding: 0,
            global_x_advance: 0,
            global_x_offset: 0,
            global_y_offset: 0,
        }
    }
}

impl AtlasRequest {
    /// Equivalent to [`AtlasRequest::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the font identifier (path or logical name).
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Sets the pixel size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Enables auto-packing with the given growth discipline.
    pub fn with_auto_pack(mut self, mode: PackMode) -> Self {
        self.auto_pack = true;
        self.pack_mode = mode;
        self
    }
}
