//! Atlas sizing and growth discipline: chooses an initial bin side
//! from the glyphs that need to fit, then grows it on overflow.

/// Growth discipline used when `autoPack` is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackMode {
    /// Round up to powers of two; double on overflow.
    Pot,
    /// Round up to a multiple of 4; grow by +32 per side on overflow.
    Aligned,
}

/// Hard cap on bin side length.
pub const MAX_BIN_SIDE: u32 = 8192;

/// Smallest bin side the sizer will ever choose.
const MIN_POT_SIDE: u32 = 16;

/// A glyph's effective packed size: the glyph's own bitmap plus every
/// margin the request asked to reserve around it.
#[derive(Clone, Copy, Debug)]
pub struct EffectiveSize {
    pub w: u32,
    pub h: u32,
}

/// Chooses the initial bin side for an auto-packed atlas.
///
/// `sizes` is every non-empty glyph's effective size (bitmap + 2*padding
/// + 2*effectPadding + spacing in each dimension).
/// Returns `None` only if `sizes` is empty and `requested_width` is also
/// invalid, which cannot happen via the orchestrator's call sites.
pub fn initial_side(mode: PackMode, sizes: &[EffectiveSize]) -> u32 {
    let total_area: u64 = sizes.iter().map(|s| s.w as u64 * s.h as u64).sum();
    let max_w = sizes.iter().map(|s| s.w).max().unwrap_or(0);
    let max_h = sizes.iter().map(|s| s.h).max().unwrap_or(0);
    let sqrt_area = (total_area as f64).sqrt().ceil() as u32;
    let min_side = max_w.max(max_h).max(sqrt_area);

    match mode {
        PackMode::Pot => next_pot(min_side.max(MIN_POT_SIDE)),
        PackMode::Aligned => round_up_to_multiple_of_4(min_side),
    }
}

/// Grows `side` to the next size per `mode`. Returns `None` once the hard
/// cap would be exceeded.
pub fn grow(mode: PackMode, side: u32) -> Option<u32> {
    let next = match mode {
        PackMode::Pot => side.saturating_mul(2),
        PackMode::Aligned => side.saturating_add(32),
    };
    if next > MAX_BIN_SIDE {
        None
    } else {
        Some(next)
    }
}

fn next_pot(mut n: u32) -> u32 {
    if n <= 1 {
        return 1;
    }
    n -= 1;
    n |= n >> 1;
    n |= n >> 2;
    n |= n >> 4;
    n |= n >> 8;
    n |= n >> 16;
    n + 1
}

fn round_up_to_multiple_of_4(n: u32) -> u32 {
    n.div_ceil(4) * 4
}
