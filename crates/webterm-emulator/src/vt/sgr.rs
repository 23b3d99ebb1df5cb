//! Select Graphic Rendition.

use tracing::trace;

use webterm_core::{Color, TextAttributes};

/// Apply SGR parameters to `attrs`.
///
/// No parameters, or an empty/zero parameter, resets everything. Extended
/// colors accept both the `38;5;n` form and the colon form `38:2::r:g:b`.
pub(super) fn apply(attrs: &mut TextAttributes, args: &[String]) {
    if args.is_empty() {
        *attrs = TextAttributes::default();
        return;
    }

    let mut index = 0;
    while index < args.len() {
        let arg = args[index].as_str();
        index += 1;

        if arg.contains(':') {
            apply_subparameters(attrs, arg);
            continue;
        }

        let code = arg.parse::<u32>().unwrap_or(0);
        match code {
            38 | 48 => {
                let (color, used) = extended_color(&args[index..]);
                index += used;
                if let Some(color) = color {
                    set_color(attrs, code, color);
                }
            }
            code => apply_code(attrs, code),
        }
    }
}

fn apply_code(attrs: &mut TextAttributes, code: u32) {
    match code {
        0 => *attrs = TextAttributes::default(),
        1 => attrs.bold = true,
        2 => attrs.faint = true,
        3 => attrs.italic = true,
        // 21 is double underline; it renders as a plain underline here.
        4 | 21 => attrs.underline = true,
        5 | 6 => attrs.blink = true,
        7 => attrs.inverse = true,
        8 => attrs.invisible = true,
        9 => attrs.strikethrough = true,
        22 => {
            attrs.bold = false;
            attrs.faint = false;
        }
        23 => attrs.italic = false,
        24 => attrs.underline = false,
        25 => attrs.blink = false,
        27 => attrs.inverse = false,
        28 => attrs.invisible = false,
        29 => attrs.strikethrough = false,
        30..=37 => attrs.foreground = Color::ansi((code - 30) as u8),
        39 => attrs.foreground = Color::Default,
        40..=47 => attrs.background = Color::ansi((code - 40) as u8),
        49 => attrs.background = Color::Default,
        90..=97 => attrs.foreground = Color::ansi((code - 90 + 8) as u8),
        100..=107 => attrs.background = Color::ansi((code - 100 + 8) as u8),
        other => trace!(code = other, "ignoring SGR code"),
    }
}

fn set_color(attrs: &mut TextAttributes, code: u32, color: Color) {
    if code == 38 {
        attrs.foreground = color;
    } else {
        attrs.background = color;
    }
}

fn component(text: Option<&String>) -> Option<u8> {
    text.and_then(|t| t.parse::<u8>().ok())
}

/// Parse the parameters following a `38`/`48`.
///
/// Returns the color (if valid) and how many parameters were consumed.
fn extended_color(rest: &[String]) -> (Option<Color>, usize) {
    match rest.first().map(String::as_str) {
        Some("5") => (component(rest.get(1)).map(Color::ansi), 2.min(rest.len())),
        Some("2") => {
            let rgb = match (
                component(rest.get(1)),
                component(rest.get(2)),
                component(rest.get(3)),
            ) {
                (Some(r), Some(g), Some(b)) => Some(Color::Rgb { r, g, b }),
                _ => None,
            };
            (rgb, 4.min(rest.len()))
        }
        _ => (None, 0),
    }
}

fn apply_subparameters(attrs: &mut TextAttributes, arg: &str) {
    let parts: Vec<String> = arg.split(':').map(str::to_string).collect();
    let code = parts[0].parse::<u32>().unwrap_or(0);
    match code {
        38 | 48 => {
            let sub = &parts[1..];
            let color = match sub.first().map(String::as_str) {
                Some("5") => component(sub.get(1)).map(Color::ansi),
                // `2:cs:r:g:b` carries a color space id; `2:r:g:b` does not.
                Some("2") if sub.len() >= 5 => extended_color(&[&sub[..1], &sub[2..]].concat()).0,
                Some("2") => extended_color(sub).0,
                _ => None,
            };
            if let Some(color) = color {
                set_color(attrs, code, color);
            }
        }
        // Underline styles: 4:0 turns underline off, any other style on.
        4 => attrs.underline = parts.get(1).map_or(true, |style| style != "0"),
        other => apply_code(attrs, other),
    }
}
