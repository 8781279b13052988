//! Orchestrator: drives the full atlas generation pipeline end-to-end,
//! owning parameter normalization and the pack-retry loop.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::bmfont;
use crate::codepoints::distinct_code_points;
use crate::compositor::{self, blit_all, Canvas, PlacedGlyph};
use crate::error::AtlasError;
use crate::font::{self, FontFace};
use crate::packer::MaxRectsPacker;
use crate::request::AtlasRequest;
use crate::sizer::{self, EffectiveSize, PackMode};

/// The two output blobs a generation call returns.
pub struct AtlasOutput {
    /// Raw PNG bytes. Bit-exact framing; base64-encoding, if
    /// any, is the transport adapter's job, not the core's.
    pub image: Vec<u8>,
    /// UTF-8, line-feed-terminated BMFont descriptor text.
    pub descriptor: String,
}

/// Generates an atlas for `req`, resolving the font by name/path.
///
/// On font resolution failure, returns an empty image and empty
/// descriptor — non-fatal (`FontUnresolved`).
pub fn generate(req: &AtlasRequest) -> AtlasOutput {
    match font::resolve(&req.font) {
        Ok((face, display_name)) => generate_with_face(req, face, &display_name),
        Err(e) => {
            warn!("font resolution failed for request: {e}");
            AtlasOutput {
                image: Vec::new(),
                descriptor: String::new(),
            }
        }
    }
}

/// Same pipeline as [`generate`], but takes an already-resolved face.
///
/// Split out so tests (and callers with their own font cache) can supply
/// a [`FontFace`] directly — see `font::tests::MockFontFace`.
pub fn generate_with_face(
    req: &AtlasRequest,
    mut face: impl FontFace,
    display_name: &str,
) -> AtlasOutput {
    face.set_pixel_size(req.size as f32);
    let ascender = face.ascender_px();
    debug!("face ascender at size {}: {}px", req.size, ascender);

    let code_points = distinct_code_points(&req.text);
    let mut glyphs = Vec::with_capacity(code_points.len());
    for cp in code_points {
        match face.load_and_render(cp) {
            Some(g) => glyphs.push(g),
            None => debug!("{}", AtlasError::GlyphLoadFailed { cp }),
        }
    }

    compositor::sort_by_height_desc(&mut glyphs);

    let effective_sizes: Vec<EffectiveSize> = glyphs
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| {
            let (w, h) = compositor::outer_size(g, req.padding, req.effect_padding, req.spacing);
            EffectiveSize { w, h }
        })
        .collect();

    let pack_mode: PackMode = req.pack_mode.into();
    let mut side = if req.auto_pack {
        sizer::initial_side(pack_mode, &effective_sizes)
    } else {
        req.width
    };

    info!(
        "starting atlas pack at {side}x{side} ({} glyphs, auto_pack={})",
        glyphs.len(),
        req.auto_pack
    );

    let mut placements = BTreeMap::new();
    let mut canvas_dims = (side, side);

    'retry: loop {
        let mut packer = MaxRectsPacker::init(side, side);
        placements.clear();
        canvas_dims = (side, side);

        for glyph in &glyphs {
            if glyph.is_empty() {
                placements.insert(
                    glyph.cp,
                    PlacedGlyph {
                        glyph: glyph.clone(),
                        rect: crate::packer::Rect::NONE,
                        outer: crate::packer::Rect::NONE,
                    },
                );
                continue;
            }

            let (ow, oh) = compositor::outer_size(glyph, req.padding, req.effect_padding, req.spacing);
            let outer = packer.insert(ow, oh);

            if outer == crate::packer::Rect::NONE {
                if req.auto_pack {
                    match sizer::grow(pack_mode, side) {
                        Some(next) => {
                            debug!("pack overflow at {side}x{side}, growing to {next}x{next}");
                            side = next;
                            continue 'retry;
                        }
                        None => {
                            warn!(
                                "{}",
                                AtlasError::PackingOverflow {
                                    side,
                                    placed: placements.values().filter(|p| !p.glyph.is_empty()).count(),
                                    requested: glyphs.len(),
                                }
                            );
                            break 'retry;
                        }
                    }
                } else {
                    warn!(
                        "{}",
                        AtlasError::PackingOverflow {
                            side,
                            placed: placements.values().filter(|p| !p.glyph.is_empty()).count(),
                            requested: glyphs.len(),
                        }
                    );
                    break 'retry;
                }
            }

            let inner = compositor::inner_rect(outer, glyph, req.padding, req.effect_padding);
            placements.insert(
                glyph.cp,
                PlacedGlyph {
                    glyph: glyph.clone(),
                    rect: inner,
                    outer,
                },
            );
        }

        break;
    }

    let mut canvas = Canvas::new(canvas_dims.0, canvas_dims.1);
    blit_all(&mut canvas, &placements);

    let descriptor = bmfont::emit(req, display_name, canvas_dims.0, canvas_dims.1, &placements);
    let image = match crate::png::encode(canvas_dims.0, canvas_dims.1, canvas.rgba()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("PNG encoding failed: {e}");
            Vec::new()
        }
    };

    info!(
        "atlas complete: {}x{}, {} chars, {} PNG bytes",
        canvas_dims.0,
        canvas_dims.1,
        placements.len(),
        image.len()
    );

    AtlasOutput { image, descriptor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::MockFontFace;
    use crate::request::PackMode as ReqPackMode;

    fn run(req: &AtlasRequest) -> AtlasOutput {
        generate_with_face(req, MockFontFace::new(), "MockFont")
    }

    #[test]
    fn empty_text_yields_zero_chars_and_a_valid_png() {
        let req = AtlasRequest {
            text: String::new(),
            width: 64,
            ..Default::default()
        };
        let out = run(&req);
        assert!(out.descriptor.contains("chars count=0"));
        assert_eq!(&out.image[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn single_glyph_produces_one_char_line() {
        let req = AtlasRequest {
            text: "A".to_string(),
            size: 16,
            width: 64,
            ..Default::default()
        };
        let out = run(&req);
        let char_lines: Vec<_> = out.descriptor.lines().filter(|l| l.starts_with("char ")).collect();
        assert_eq!(char_lines.len(), 1);
        assert!(char_lines[0].starts_with("char id=65"));
    }

    #[test]
    fn repeated_characters_produce_one_char_line_each() {
        let req = AtlasRequest {
            text: "AABBA".to_string(),
            size: 16,
            width: 128,
            ..Default::default()
        };
        let out = run(&req);
        let char_lines: Vec<_> = out.descriptor.lines().filter(|l| l.starts_with("char ")).collect();
        assert_eq!(char_lines.len(), 2);
    }

    #[test]
    fn whitespace_glyph_has_zero_size_but_nonzero_advance() {
        let req = AtlasRequest {
            text: " A".to_string(),
            size: 16,
            width: 64,
            ..Default::default()
        };
        let out = run(&req);
        let space_line = out
            .descriptor
            .lines()
            .find(|l| l.starts_with(&format!("char id={}", ' ' as u32)))
            .unwrap();
        assert!(space_line.contains("width=0 height=0"));
        assert!(!space_line.contains("xadvance=0 "));
    }

    #[test]
    fn auto_pack_pot_growth_reaches_a_power_of_two() {
        // 40 distinct glyphs at size 32 cannot fit in a 64x64 bin; growth
        // must kick in and land on a power-of-two side.
        let text: String = (b'A'..=b'Z').chain(b'a'..=b'n').map(|b| b as char).collect();
        let req = AtlasRequest {
            text,
            size: 32,
            width: 64,
            auto_pack: true,
            pack_mode: ReqPackMode::Pot,
            ..Default::default()
        };
        let out = run(&req);
        let scale_w_line = out.descriptor.lines().find(|l| l.starts_with("common")).unwrap();
        let scale_w: u32 = scale_w_line
            .split_whitespace()
            .find_map(|t| t.strip_prefix("scaleW="))
            .unwrap()
            .parse()
            .unwrap();
        assert!(scale_w.is_power_of_two());
        assert!(scale_w >= 64);
    }

    #[test]
    fn placed_rectangles_never_overlap() {
        let req = AtlasRequest {
            text: "Hello, World! 0123456789".to_string(),
            size: 12,
            width: 256,
            ..Default::default()
        };
        let out = run(&req);
        let rects: Vec<(i64, i64, i64, i64)> = out
            .descriptor
            .lines()
            .filter(|l| l.starts_with("char "))
            .filter_map(|l| {
                let get = |key: &str| -> i64 {
                    l.split_whitespace()
                        .find_map(|t| t.strip_prefix(key))
                        .unwrap()
                        .parse()
                        .unwrap()
                };
                let (w, h) = (get("width="), get("height="));
                if w == 0 || h == 0 {
                    return None;
                }
                Some((get("x="), get("y="), w, h))
            })
            .collect();

        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                let (ax, ay, aw, ah) = rects[i];
                let (bx, by, bw, bh) = rects[j];
                let disjoint = ax + aw <= bx || bx + bw <= ax || ay + ah <= by || by + bh <= ay;
                assert!(disjoint, "rects {i} and {j} overlap");
            }
        }
    }

    #[test]
    fn global_x_advance_shifts_every_char_by_the_same_delta() {
        let base_req = AtlasRequest {
            text: "AB".to_string(),
            size: 16,
            width: 64,
            ..Default::default()
        };
        let shifted_req = AtlasRequest {
            global_x_advance: 5,
            ..base_req.clone()
        };
        let base = run(&base_req);
        let shifted = run(&shifted_req);

        let advances = |d: &str| -> Vec<i64> {
            d.lines()
                .filter(|l| l.starts_with("char "))
                .map(|l| {
                    l.split_whitespace()
                        .find_map(|t| t.strip_prefix("xadvance="))
                        .unwrap()
                        .parse()
                        .unwrap()
                })
                .collect()
        };
        let (b, s) = (advances(&base.descriptor), advances(&shifted.descriptor));
        assert_eq!(b.len(), s.len());
        for (bv, sv) in b.iter().zip(s.iter()) {
            assert_eq!(sv - bv, 5);
        }
    }

    #[test]
    fn effect_padding_enlarges_rect_and_shifts_offset_by_one() {
        let base_req = AtlasRequest {
            text: "A".to_string(),
            size: 16,
            width: 64,
            ..Default::default()
        };
        let padded_req = AtlasRequest {
            effect_padding: 1,
            ..base_req.clone()
        };
        let base = run(&base_req);
        let padded = run(&padded_req);

        let field = |d: &str, key: &str| -> i64 {
            d.lines()
                .find(|l| l.starts_with("char "))
                .unwrap()
                .split_whitespace()
                .find_map(|t| t.strip_prefix(key))
                .unwrap()
                .parse()
                .unwrap()
        };

        assert_eq!(field(&padded.descriptor, "width=") - field(&base.descriptor, "width="), 2);
        assert_eq!(field(&padded.descriptor, "height=") - field(&base.descriptor, "height="), 2);
        assert_eq!(field(&padded.descriptor, "xoffset=") - field(&base.descriptor, "xoffset="), -1);
        assert_eq!(field(&padded.descriptor, "yoffset=") - field(&base.descriptor, "yoffset="), -1);
    }

    #[test]
    fn png_decodes_to_requested_dimensions() {
        let req = AtlasRequest {
            text: "A".to_string(),
            size: 16,
            width: 64,
            ..Default::default()
        };
        let out = run(&req);
        let ihdr = &out.image[16..16 + 13];
        let w = u32::from_be_bytes(ihdr[0..4].try_into().unwrap());
        let h = u32::from_be_bytes(ihdr[4..8].try_into().unwrap());
        assert_eq!(w, 64);
        assert_eq!(h, 64);
        assert_eq!(ihdr[9], 6); // RGBA color type
    }

    #[test]
    fn same_request_produces_byte_identical_output() {
        let req = AtlasRequest {
            text: "Hello".to_string(),
            size: 20,
            width: 128,
            ..Default::default()
        };
        let a = run(&req);
        let b = run(&req);
        assert_eq!(a.image, b.image);
        assert_eq!(a.descriptor, b.descriptor);
    }
}
