//! Font face abstraction and font resolution.
//!
//! [`FontFace`] is a narrow seam: the core only needs three operations
//! from a rasterizer, so any engine that can provide them satisfies the
//! contract. [`FontdueFace`] is the production implementation, backed by
//! `fontdue`. Tests use a synthetic face instead (see
//! `font::tests::MockFontFace`) so the suite never depends on a real TTF
//! file being present.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::AtlasError;

/// A single rasterized glyph plus its layout metrics
#[derive(Clone, Debug, Default)]
pub struct Glyph {
    /// The code point this glyph was rasterized for.
    pub cp: u32,
    /// Coverage bitmap width in pixels. May be 0 for whitespace-like glyphs.
    pub w: u32,
    /// Coverage bitmap height in pixels. May be 0 for whitespace-like glyphs.
    pub h: u32,
    /// Horizontal advance in whole pixels.
    pub xadv: i32,
    /// Pen-relative horizontal offset (bitmap left bearing).
    pub xoff: i32,
    /// Pen-relative vertical offset: face ascender in pixels minus bitmap top.
    pub yoff: i32,
    /// `w * h` bytes of 8-bit alpha coverage. Empty when `w * h == 0`.
    pub coverage: Vec<u8>,
}

impl Glyph {
    /// Whether this glyph has any pixels to composite.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// The minimal interface the atlas pipeline needs from a font engine.
///
/// Implementations are expected to be stateful per pixel size (see
/// [`FontFace::set_pixel_size`]) and are owned for the duration of a
/// single request.
pub trait FontFace {
    /// Configures the nominal glyph size for subsequent `load_and_render` calls.
    fn set_pixel_size(&mut self, px: f32);

    /// Rasterizes `cp`, returning its coverage bitmap and metrics, or
    /// `None` if the face lacks a glyph for that code point.
    fn load_and_render(&mut self, cp: u32) -> Option<Glyph>;

    /// The face's ascender at the currently configured pixel size,
    /// shared by every glyph as the common baseline reference.
    fn ascender_px(&self) -> i32;
}

/// Production [`FontFace`] implementation backed by `fontdue`.
pub struct FontdueFace {
    font: fontdue::Font,
    size_px: f32,
}

impl FontdueFace {
    /// Parses TTF/OTF bytes into a renderable face.
    pub fn from_bytes(data: &[u8]) -> Result<Self, AtlasError> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| AtlasError::FontUnresolved {
                name: format!("<embedded font data>: {e}"),
            })?;
        Ok(Self { font, size_px: 16.0 })
    }
}

impl FontFace for FontdueFace {
    fn set_pixel_size(&mut self, px: f32) {
        self.size_px = px;
    }

    fn load_and_render(&mut self, cp: u32) -> Option<Glyph> {
        let ch = char::from_u32(cp)?;
        if self.font.lookup_glyph_index(ch) == 0 && ch != ' ' {
            return None;
        }
        let (metrics, bitmap) = self.font.rasterize(ch, self.size_px);
        let ascent = self.ascender_px();
        Some(Glyph {
            cp,
            w: metrics.width as u32,
            h: metrics.height as u32,
            xadv: metrics.advance_width.round() as i32,
            xoff: metrics.xmin,
            yoff: ascent - (metrics.ymin + metrics.height as i32),
            coverage: bitmap,
        })
    }

    fn ascender_px(&self) -> i32 {
        self.font
            .horizontal_line_metrics(self.size_px)
            .map(|m| m.ascent.round() as i32)
            .unwrap_or((self.size_px * 0.8).round() as i32)
    }
}

/// Candidate system font directories to search when a logical font name
/// isn't a path and isn't in the built-in lookup table.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/noto",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Resolves a logical font name or filesystem path to a loaded face.
///
/// Strings containing `/`, `\`, or `.` are treated as paths; anything
/// else is looked up by name, falling back to the first readable font
/// under [`SYSTEM_FONT_DIRS`]. Returns the display name used by the
/// BMFont `face=` field alongside the loaded face.
pub fn resolve(name_or_path: &str) -> Result<(FontdueFace, String), AtlasError> {
    let looks_like_path = name_or_path.contains('/')
        || name_or_path.contains('\\')
        || name_or_path.contains('.');

    if looks_like_path {
        let path = Path::new(name_or_path);
        let data = std::fs::read(path).map_err(|e| {
            warn!("failed to read font path {name_or_path:?}: {e}");
            AtlasError::FontUnresolved {
                name: name_or_path.to_string(),
            }
        })?;
        let face = FontdueFace::from_bytes(&data)?;
        let display = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name_or_path.to_string());
        return Ok((face, display));
    }

    debug!("resolving logical font name {name_or_path:?} via system font search");
    for dir in SYSTEM_FONT_DIRS {
        if let Some(path) = first_font_in_dir(Path::new(dir)) {
            if let Ok(data) = std::fs::read(&path) {
                if let Ok(face) = FontdueFace::from_bytes(&data) {
                    return Ok((face, name_or_path.to_string()));
                }
            }
        }
    }

    warn!("no system font found for {name_or_path:?}");
    Err(AtlasError::FontUnresolved {
        name: name_or_path.to_string(),
    })
}

fn first_font_in_dir(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("ttf") | Some("otf") | Some("ttc") => return Some(path),
            _ => continue,
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A synthetic [`FontFace`] used throughout the test suite so tests
    /// never depend on a real font file being present on disk.
    ///
    /// Every non-space ASCII letter renders as an `n x n` solid-coverage
    /// square (`n` == pixel size), so packing and layout geometry can be
    /// checked without needing real glyph shapes.
    pub struct MockFontFace {
        pub size_px: u32,
    }

    impl MockFontFace {
        pub fn new() -> Self {
            Self { size_px: 16 }
        }
    }

    impl FontFace for MockFontFace {
        fn set_pixel_size(&mut self, px: f32) {
            self.size_px = px.round() as u32;
        }

        fn load_and_render(&mut self, cp: u32) -> Option<Glyph> {
            let ch = char::from_u32(cp)?;
            if ch == ' ' {
                return Some(Glyph {
                    cp,
                    w: 0,
                    h: 0,
                    xadv: (self.size_px / 3) as i32,
                    xoff: 0,
                    yoff: 0,
                    coverage: Vec::new(),
                });
            }
            let n = self.size_px;
            Some(Glyph {
                cp,
                w: n,
                h: n,
                xadv: n as i32 + 1,
                xoff: 0,
                yoff: 0,
                coverage: vec![200u8; (n * n) as usize],
            })
        }

        fn ascender_px(&self) -> i32 {
            (self.size_px as f32 * 0.8).round() as i32
        }
    }

    #[test]
    fn mock_face_produces_square_glyphs() {
        let mut face = MockFontFace::new();
        face.set_pixel_size(8.0);
        let g = face.load_and_render('A' as u32).unwrap();
        assert_eq!(g.w, 8);
        assert_eq!(g.h, 8);
        assert_eq!(g.coverage.len(), 64);
    }

    #[test]
    fn mock_face_space_is_empty() {
        let mut face = MockFontFace::new();
        face.set_pixel_size(8.0);
        let g = face.load_and_render(' ' as u32).unwrap();
        assert!(g.is_empty());
        assert!(g.xadv > 0);
    }

    #[test]
    fn resolve_unknown_path_fails() {
        let err = resolve("/definitely/not/a/real/font.ttf");
        assert!(err.is_err());
    }
}
