//! UTF-8 decoding into a set of distinct code points.
//!
//! The orchestrator only cares about which scalars appear in the input,
//! never their order or multiplicity, so this module exposes a single
//! function rather than an iterator adapter.

use std::collections::BTreeSet;

/// Scans `text` and returns the set of distinct Unicode scalar values
/// present in it.
///
/// `text` is already valid UTF-8 (the type system guarantees it), so this
/// is really just "which chars occur", but it's kept as its own module
/// alongside a more permissive byte-level decoder (see [`decode_lenient`])
/// for callers that don't get a `&str` for free.
pub fn distinct_code_points(text: &str) -> BTreeSet<u32> {
    text.chars().map(|c| c as u32).collect()
}

/// A permissive UTF-8 scanner over raw bytes: it reads the
/// continuation-byte count off the leading byte's prefix and masks the
/// low six bits of each continuation byte without checking the high bits.
///
/// This will happily decode sequences that `std::str::from_utf8` would
/// reject. Callers that want strict validation should decode with
/// `std::str::from_utf8` and call [`distinct_code_points`] instead; the
/// exact scalar set extracted from malformed input is unspecified and
/// shouldn't be relied on.
pub fn decode_lenient(bytes: &[u8]) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        let (len, mut scalar) = if lead & 0x80 == 0 {
            (1, lead as u32)
        } else if lead & 0xE0 == 0xC0 {
            (2, (lead & 0x1F) as u32)
        } else if lead & 0xF0 == 0xE0 {
            (3, (lead & 0x0F) as u32)
        } else if lead & 0xF8 == 0xF0 {
            (4, (lead & 0x07) as u32)
        } else {
            i += 1;
            continue;
        };

        if i + len > bytes.len() {
            break;
        }
        for &b in &bytes[i + 1..i + len] {
            scalar = (scalar << 6) | (b & 0x3F) as u32;
        }
        out.insert(scalar);
        i += len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_code_points() {
        assert!(distinct_code_points("").is_empty());
    }

    #[test]
    fn dedups_repeated_ascii() {
        let cps = distinct_code_points("AABBA");
        assert_eq!(cps, BTreeSet::from(['A' as u32, 'B' as u32]));
    }

    #[test]
    fn whitespace_is_its_own_code_point() {
        let cps = distinct_code_points(" A");
        assert_eq!(cps, BTreeSet::from([' ' as u32, 'A' as u32]));
    }

    #[test]
    fn non_ascii_scalars_are_counted() {
        let cps = distinct_code_points("café");
        assert!(cps.contains(&('é' as u32)));
        assert_eq!(cps.len(), 4);
    }

    #[test]
    fn lenient_decoder_matches_strict_on_valid_input() {
        let s = "héllo";
        let strict = distinct_code_points(s);
        let lenient = decode_lenient(s.as_bytes());
        assert_eq!(strict, lenient);
    }

    #[quickcheck_macros::quickcheck]
    fn lenient_decoder_never_panics(bytes: Vec<u8>) -> bool {
        decode_lenient(&bytes);
        true
    }
}
