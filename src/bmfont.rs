//! BMFont text emitter.

use std::fmt::Write as _;

use crate::compositor::PlacedGlyph;
use crate::request::AtlasRequest;

/// Emits the full BMFont descriptor text for a completed atlas.
///
/// `placements` must already carry each glyph's final (padding-free) rect
/// and metrics, consistent with whatever was blitted into the canvas —
/// that consistency is the core invariant the whole pipeline exists to
/// uphold.
pub fn emit(
    req: &AtlasRequest,
    display_name: &str,
    scale_w: u32,
    scale_h: u32,
    placements: &std::collections::BTreeMap<u32, PlacedGlyph>,
) -> String {
    let mut out = String::new();
    let p = req.padding;
    let s = req.spacing;

    let _ = writeln!(
        out,
        "info face=\"{display_name}\" size={size} bold=0 italic=0 charset=\"\" unicode=1 stretchH=100 smooth=1 aa=1 padding={p},{p},{p},{p} spacing={s},{s} outline=0",
        size = req.size,
    );

    let base = req.size as f64 * 0.8;
    let _ = writeln!(
        out,
        "common lineHeight={size} base={base:.1} scaleW={scale_w} scaleH={scale_h} pages=1 packed=0 alphaChnl=0 redChnl=0 greenChnl=0 blueChnl=0",
        size = req.size,
    );

    let _ = writeln!(out, "page id=0 file=\"texture.png\"");

    let _ = writeln!(out, "chars count={}", placements.len());

    let e = req.effect_padding as i64;
    for placed in placements.values() {
        let g = &placed.glyph;
        let xadv = g.xadv as i64 + req.global_x_advance as i64;

        if g.is_empty() {
            let _ = writeln!(
                out,
                "char id={cp} x=0 y=0 width=0 height=0 xoffset=0 yoffset=0 xadvance={xadv} page=0 chnl=15",
                cp = g.cp,
            );
            continue;
        }

        let rect = &placed.rect;
        let x = rect.x as i64 - e;
        let y = rect.y as i64 - e;
        let w = g.w as i64 + 2 * e;
        let h = g.h as i64 + 2 * e;
        let xo = g.xoff as i64 - e + req.global_x_offset as i64;
        let yo = g.yoff as i64 - e + req.global_y_offset as i64;

        let _ = writeln!(
            out,
            "char id={cp} x={x} y={y} width={w} height={h} xoffset={xo} yoffset={yo} xadvance={xadv} page=0 chnl=15",
            cp = g.cp,
        );
    }

    out
}
