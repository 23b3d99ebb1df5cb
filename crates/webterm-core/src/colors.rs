//! Conversions between the CSS and X11 color notations used by preferences
//! and color-query sequences.

use lazy_static::lazy_static;
use regex::Regex;

use crate::cell::Color;
use crate::error::{Error, Result};

lazy_static! {
    static ref RGB_RE: Regex = Regex::new(
        r"^\s*rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9.]+)\s*)?\)\s*$"
    )
    .expect("static rgb regex");
    static ref X11_RE: Regex =
        Regex::new(r"^\s*rgb:([0-9a-fA-F]{1,4})/([0-9a-fA-F]{1,4})/([0-9a-fA-F]{1,4})\s*$")
            .expect("static x11 regex");
    static ref HEX_RE: Regex =
        Regex::new(r"^\s*#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})\s*$").expect("static hex regex");
}

/// Parse a CSS `rgb(...)`/`rgba(...)` string into its three 8-bit channels.
fn parse_rgb(value: &str) -> Result<(u8, u8, u8)> {
    let caps = RGB_RE
        .captures(value)
        .ok_or_else(|| Error::InvalidColor(value.to_string()))?;
    let channel = |i: usize| -> Result<u8> {
        caps[i]
            .parse::<u8>()
            .map_err(|_| Error::InvalidColor(value.to_string()))
    };
    Ok((channel(1)?, channel(2)?, channel(3)?))
}

/// Parse `#rgb` or `#rrggbb`.
fn parse_hex(value: &str) -> Result<(u8, u8, u8)> {
    let caps = HEX_RE
        .captures(value)
        .ok_or_else(|| Error::InvalidColor(value.to_string()))?;
    let digits = &caps[1];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16)
            .map_err(|_| Error::InvalidColor(value.to_string()))
    };
    Ok((channel(0)?, channel(1)?, channel(2)?))
}

/// Scale a 1-4 digit X11 hex channel to 8 bits.
fn scale_x11(digits: &str) -> u8 {
    let parse = |s: &str| u32::from_str_radix(s, 16).unwrap_or(0);
    match digits.len() {
        1 => parse(&format!("{digits}{digits}")) as u8,
        2 => parse(digits) as u8,
        3 => {
            let padded = format!("{digits}{}", &digits[2..]);
            ((parse(&padded) as f64) / 257.0).round() as u8
        }
        _ => ((parse(digits) as f64) / 257.0).round() as u8,
    }
}

/// Convert `rgb(r, g, b)` to the X11 `rgb:rrrr/gggg/bbbb` form.
pub fn rgb_to_x11(value: &str) -> Result<String> {
    let (r, g, b) = parse_rgb(value)?;
    Ok(format!(
        "rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}"
    ))
}

/// Convert an X11 `rgb:r/g/b` color to CSS `rgba(r,g,b,1)`.
pub fn x11_to_css(value: &str) -> Result<String> {
    let caps = X11_RE
        .captures(value)
        .ok_or_else(|| Error::InvalidColor(value.to_string()))?;
    Ok(format!(
        "rgba({},{},{},1)",
        scale_x11(&caps[1]),
        scale_x11(&caps[2]),
        scale_x11(&caps[3])
    ))
}

/// Convert `rgb(r, g, b)` to `#rrggbb`.
pub fn rgb_to_hex(value: &str) -> Result<String> {
    let (r, g, b) = parse_rgb(value)?;
    Ok(format!("#{r:02x}{g:02x}{b:02x}"))
}

/// Convert `#rrggbb` (or `#rgb`) to `rgb(r,g,b)`.
pub fn hex_to_rgb(value: &str) -> Result<String> {
    let (r, g, b) = parse_hex(value)?;
    Ok(format!("rgb({r},{g},{b})"))
}

/// Parse any supported CSS notation into a [`Color::Rgb`].
pub fn parse_css(value: &str) -> Result<Color> {
    let (r, g, b) = if value.trim_start().starts_with('#') {
        parse_hex(value)?
    } else {
        parse_rgb(value)?
    };
    Ok(Color::Rgb { r, g, b })
}
