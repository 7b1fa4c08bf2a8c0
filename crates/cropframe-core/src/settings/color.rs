//! CSS colour parsing for the output background fill.

use image::Rgba;

use super::SettingsError;

/// Parse a CSS colour string into RGBA.
///
/// Supports `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with `a` in `[0, 1]`, `transparent` and the basic named
/// colours.
pub fn parse_css_color(input: &str) -> Result<Rgba<u8>, SettingsError> {
    let value = input.trim().to_ascii_lowercase();
    let invalid = || SettingsError::InvalidColor(input.to_string());

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(args).ok_or_else(invalid);
    }

    named_color(&value).ok_or_else(invalid)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        Some(v.round().clamp(0.0, 255.0) as u8)
    };

    let alpha = match parts.get(3) {
        Some(s) => {
            let a: f64 = s.parse().ok()?;
            (a.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some(Rgba([
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ]))
}

fn named_color(name: &str) -> Option<Rgba<u8>> {
    let rgba = match name {
        "transparent" => [0, 0, 0, 0],
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "lime" => [0, 255, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "silver" => [192, 192, 192, 255],
        _ => return None,
    };
    Some(Rgba(rgba))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(parse_css_color("#fff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_css_color("#f008").unwrap(), Rgba([255, 0, 0, 136]));
    }

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(parse_css_color("#1e90ff").unwrap(), Rgba([30, 144, 255, 255]));
        assert_eq!(parse_css_color("#00000080").unwrap(), Rgba([0, 0, 0, 128]));
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(
            parse_css_color("rgb(10, 20, 30)").unwrap(),
            Rgba([10, 20, 30, 255])
        );
        assert_eq!(
            parse_css_color("rgba(255,255,255,.5)").unwrap(),
            Rgba([255, 255, 255, 128])
        );
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_css_color("White").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_css_color("transparent").unwrap(), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_reject_garbage() {
        assert!(parse_css_color("#12345").is_err());
        assert!(parse_css_color("#ggg").is_err());
        assert!(parse_css_color("rgb(1,2)").is_err());
        assert!(parse_css_color("chartreuse-ish").is_err());
    }
}
