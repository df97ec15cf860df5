/// Read the longest leading decimal number in `literal`, the way form values
/// arrive from the block editor (`"12px"` → 12, `"1.2.3"` → 1.2).
///
/// Leading ASCII whitespace and a single sign are accepted, as is an exponent
/// that is followed by at least one digit. Anything without a leading number
/// reads as 0.
pub fn leading_number(literal: &str) -> f64 {
    let bytes = literal
        .trim_start_matches([' ', '\t', '\n', '\r', '\x0B', '\x0C'])
        .as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    // The prefix is pure ASCII, so slicing at `end` stays on a char boundary.
    std::str::from_utf8(&bytes[..end])
        .ok()
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Round half away from zero to `places` decimal places.
///
/// The scaled value is first cut to 15 significant digits so a decimal half
/// stored just below its binary neighbour (`0.285` is `0.28499999…`) still
/// rounds up.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let pre_rounded: f64 = format!("{scaled:.14e}").parse().unwrap_or(scaled);
    pre_rounded.round() / factor
}

/// Shortest decimal rendering used in CSS output: `1`, `0.5`, `12.25`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapses -0.
        return "0".to_owned();
    }
    value.to_string()
}
