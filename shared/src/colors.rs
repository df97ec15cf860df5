use std::sync::LazyLock;

use regex::Regex;

use crate::numeric::{format_number, leading_number, round_to};

/// `rgb(r, g, b)` / `rgba(r, g, b, a)`, searched anywhere in the input.
static FUNCTIONAL_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)rgba?\s*\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*([\d.]+))?\s*\)")
        .expect("functional color pattern compiles")
});

/// Bare or `#`-prefixed run of 3 to 8 hex digits, nothing else.
static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([a-fA-F0-9]{3,8})$").expect("hex color pattern compiles")
});

/// Tint used when a color cannot be decoded.
const FALLBACK_CHANNEL: u8 = 255;

/// Which input shape a color string was recognized as.
///
/// Patterns are tried in declaration order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMatch {
    /// Functional notation. Channels are passed through unclamped.
    Rgba { r: i64, g: i64, b: i64, alpha: f64 },
    /// Hex notation with 3, 4, 6 or 8 digits; `alpha` is in `[0, 1]`.
    Hex { r: u8, g: u8, b: u8, alpha: f64 },
    /// Hex digits only, but 5 or 7 of them.
    HexBadLength,
    Unrecognized,
}

/// Classify `color` after trimming surrounding whitespace.
pub fn classify(color: &str) -> ColorMatch {
    let color = color.trim_matches([' ', '\t', '\n', '\r', '\0', '\x0B']);

    if let Some(caps) = FUNCTIONAL_COLOR.captures(color) {
        return ColorMatch::Rgba {
            r: parse_channel(&caps[1]),
            g: parse_channel(&caps[2]),
            b: parse_channel(&caps[3]),
            alpha: caps.get(4).map_or(1.0, |m| leading_number(m.as_str())),
        };
    }

    let Some(caps) = HEX_COLOR.captures(color) else {
        return ColorMatch::Unrecognized;
    };
    let digits = caps[1].as_bytes();
    match digits.len() {
        3 | 4 => ColorMatch::Hex {
            r: doubled(digits[0]),
            g: doubled(digits[1]),
            b: doubled(digits[2]),
            alpha: digits.get(3).map_or(1.0, |&d| f64::from(doubled(d)) / 255.0),
        },
        6 | 8 => ColorMatch::Hex {
            r: pair(digits[0], digits[1]),
            g: pair(digits[2], digits[3]),
            b: pair(digits[4], digits[5]),
            alpha: if digits.len() == 8 {
                f64::from(pair(digits[6], digits[7])) / 255.0
            } else {
                1.0
            },
        },
        _ => ColorMatch::HexBadLength,
    }
}

/// Normalize any supported color to `rgba(R, G, B, A)`, folding `opacity`
/// into the alpha channel.
///
/// Never fails: unrecognized input becomes white at `opacity`. The result is
/// not HTML-escaped.
pub fn color_to_rgba(color: &str, opacity: f64) -> String {
    match classify(color) {
        ColorMatch::Rgba { r, g, b, alpha } => format_rgba(r, g, b, alpha * opacity),
        ColorMatch::Hex { r, g, b, alpha } => {
            format_rgba(i64::from(r), i64::from(g), i64::from(b), alpha * opacity)
        }
        ColorMatch::HexBadLength | ColorMatch::Unrecognized => {
            let white = i64::from(FALLBACK_CHANNEL);
            format_rgba(white, white, white, opacity)
        }
    }
}

fn format_rgba(r: i64, g: i64, b: i64, alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {})", format_number(round_to(alpha, 2)))
}

fn parse_channel(digits: &str) -> i64 {
    // The pattern only admits ASCII digits, so overflow is the only failure.
    digits.parse().unwrap_or(i64::MAX)
}

fn doubled(digit: u8) -> u8 {
    pair(digit, digit)
}

fn pair(hi: u8, lo: u8) -> u8 {
    (nibble(hi) << 4) | nibble(lo)
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorMatch, classify, color_to_rgba};

    #[test]
    fn short_hex_duplicates_each_digit() {
        assert_eq!(color_to_rgba("#fff", 0.5), "rgba(255, 255, 255, 0.5)");
        assert_eq!(color_to_rgba("abc", 1.0), "rgba(170, 187, 204, 1)");
    }

    #[test]
    fn short_hex_with_alpha_scales_opacity() {
        // 8 → 0x88 = 136, 136 / 255 ≈ 0.533
        assert_eq!(color_to_rgba("#0008", 1.0), "rgba(0, 0, 0, 0.53)");
        assert_eq!(color_to_rgba("#000f", 0.4), "rgba(0, 0, 0, 0.4)");
    }

    #[test]
    fn long_hex_decodes_pairs() {
        assert_eq!(color_to_rgba("#000000", 1.0), "rgba(0, 0, 0, 1)");
        assert_eq!(color_to_rgba("#1A2b3C", 1.0), "rgba(26, 43, 60, 1)");
        assert_eq!(color_to_rgba("#ffffff80", 1.0), "rgba(255, 255, 255, 0.5)");
        assert_eq!(color_to_rgba("ff000000", 1.0), "rgba(255, 0, 0, 0)");
    }

    #[test]
    fn functional_alpha_is_multiplied_by_opacity() {
        assert_eq!(
            color_to_rgba("rgba(10, 20, 30, 0.4)", 0.5),
            "rgba(10, 20, 30, 0.2)"
        );
        assert_eq!(color_to_rgba("rgb(1,2,3)", 0.25), "rgba(1, 2, 3, 0.25)");
        assert_eq!(
            color_to_rgba("  rgb ( 4 , 5 , 6 )\n", 1.0),
            "rgba(4, 5, 6, 1)"
        );
    }

    #[test]
    fn alpha_rounding_follows_decimal_halves() {
        assert_eq!(
            color_to_rgba("rgba(255,255,255,0.57)", 0.5),
            "rgba(255, 255, 255, 0.29)"
        );
        assert_eq!(color_to_rgba("rgba(0,0,0,0.29)", 0.5), "rgba(0, 0, 0, 0.15)");
        assert_eq!(color_to_rgba("#fff", 0.285), "rgba(255, 255, 255, 0.29)");
        assert_eq!(color_to_rgba("#fff", 0.145), "rgba(255, 255, 255, 0.15)");
        assert_eq!(color_to_rgba("#fff", 1.005), "rgba(255, 255, 255, 1.01)");
        assert_eq!(color_to_rgba("nope", 0.145), "rgba(255, 255, 255, 0.15)");
    }

    #[test]
    fn functional_channels_are_not_clamped() {
        assert_eq!(color_to_rgba("rgb(300, 0, 999)", 1.0), "rgba(300, 0, 999, 1)");
    }

    #[test]
    fn functional_pattern_matches_inside_longer_text() {
        assert_eq!(
            color_to_rgba("color: rgba(1, 2, 3, .5) !important", 1.0),
            "rgba(1, 2, 3, 0.5)"
        );
    }

    #[test]
    fn malformed_alpha_reads_leading_decimal() {
        assert_eq!(color_to_rgba("rgba(1, 2, 3, 0.5.9)", 1.0), "rgba(1, 2, 3, 0.5)");
        assert_eq!(color_to_rgba("rgba(1, 2, 3, .)", 1.0), "rgba(1, 2, 3, 0)");
    }

    #[test]
    fn unknown_formats_fall_back_to_white() {
        assert_eq!(color_to_rgba("notacolor", 0.7), "rgba(255, 255, 255, 0.7)");
        assert_eq!(color_to_rgba("", 0.333), "rgba(255, 255, 255, 0.33)");
        assert_eq!(color_to_rgba("hsl(0, 0%, 0%)", 1.0), "rgba(255, 255, 255, 1)");
        assert_eq!(color_to_rgba("#ggg", 1.0), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn odd_hex_lengths_fall_back_to_white() {
        assert_eq!(color_to_rgba("#12345", 0.3), "rgba(255, 255, 255, 0.3)");
        assert_eq!(color_to_rgba("#1234567", 0.3), "rgba(255, 255, 255, 0.3)");
        assert_eq!(classify("#12345"), ColorMatch::HexBadLength);
        assert_eq!(classify("#123456789"), ColorMatch::Unrecognized);
    }

    #[test]
    fn functional_notation_wins_over_hex() {
        assert!(matches!(classify("rgb(1,2,3)"), ColorMatch::Rgba { .. }));
        assert!(matches!(classify("#abc"), ColorMatch::Hex { .. }));
    }

    #[test]
    fn output_is_stable_when_fed_back_in() {
        let inputs = [
            ("#fff", 0.5),
            ("#ffffff80", 1.0),
            ("#0008", 0.9),
            ("rgba(10, 20, 30, 0.4)", 0.5),
            ("rgb(1,2,3)", 0.25),
            ("notacolor", 0.7),
            ("#12345", 0.3),
        ];

        for (color, opacity) in inputs {
            let once = color_to_rgba(color, opacity);
            assert_eq!(color_to_rgba(&once, 1.0), once, "input {color}");
        }
    }

    #[test]
    fn every_hex_digit_decodes_into_range() {
        for digit in "0123456789abcdefABCDEF".chars() {
            let short = format!("#{digit}{digit}{digit}{digit}");
            let ColorMatch::Hex { alpha, .. } = classify(&short) else {
                panic!("{short} should decode as hex");
            };
            assert!((0.0..=1.0).contains(&alpha));

            let long = format!("{digit}0{digit}0{digit}0{digit}f");
            let ColorMatch::Hex { alpha, .. } = classify(&long) else {
                panic!("{long} should decode as hex");
            };
            assert!((0.0..=1.0).contains(&alpha));
        }
    }
}
