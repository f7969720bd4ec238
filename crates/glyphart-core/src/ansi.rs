//! ANSI escape handling
//!
//! Rendered blocks carry SGR color escapes. This module measures and strips
//! them, and translates the 256-color scheme used by the compositor into
//! inline HTML spans for non-terminal presentation.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::color::Rgb;

/// SGR reset marker appended after every colored segment
pub const RESET: &str = "\x1b[0m";

static SGR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("Invalid SGR regex"));

static FOREGROUND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[(?:38;5;(\d{1,3})|3([0-7]))m").expect("Invalid foreground regex")
});

/// Standard colors 0-7, matching typical terminal defaults
const STANDARD_COLORS: [Rgb; 8] = [
    Rgb::new(0x00, 0x00, 0x00), // Black
    Rgb::new(0xCD, 0x00, 0x00), // Red
    Rgb::new(0x00, 0xCD, 0x00), // Green
    Rgb::new(0xCD, 0xCD, 0x00), // Yellow
    Rgb::new(0x00, 0x00, 0xEE), // Blue
    Rgb::new(0xCD, 0x00, 0xCD), // Magenta
    Rgb::new(0x00, 0xCD, 0xCD), // Cyan
    Rgb::new(0xE5, 0xE5, 0xE5), // White
];

/// 256-color foreground escape for a palette index
pub fn foreground_256(index: u8) -> String {
    format!("\x1b[38;5;{}m", index)
}

/// Remove all SGR escape sequences
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    SGR_REGEX.replace_all(s, "")
}

/// Whether `s` contains an escape character
pub fn has_ansi(s: &str) -> bool {
    s.contains('\x1b')
}

/// Column count of `s` once escapes are removed
pub fn visible_length(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Web color for a palette index.
///
/// Indexes 0-7 use the standard colors, 16-231 the 6x6x6 cube in steps of
/// 51 and 232-255 the gray ramp. Bright colors 8-15 fall back to black.
pub fn palette_rgb(index: u8) -> Rgb {
    match index {
        0..=7 => STANDARD_COLORS[index as usize],
        16..=231 => {
            let c = index - 16;
            Rgb::new((c / 36) % 6 * 51, (c / 6) % 6 * 51, (c % 6) * 51)
        }
        232..=255 => {
            let level = 8 + (index - 232) * 10;
            Rgb::new(level, level, level)
        }
        _ => Rgb::default(),
    }
}

/// Translate foreground escapes into `<span style="color:#rrggbb">` and
/// resets into `</span>`.
///
/// The input is expected to be HTML-safe already; escapes are the only
/// markup introduced.
pub fn ansi_to_html(s: &str) -> String {
    let spans = FOREGROUND_REGEX.replace_all(s, |caps: &Captures<'_>| {
        let index = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .or_else(|| caps.get(2).and_then(|m| m.as_str().parse::<u8>().ok()))
            .unwrap_or(0);
        format!(r#"<span style="color:{}">"#, palette_rgb(index).to_hex())
    });
    let closed = spans.replace(RESET, "</span>");
    // Any other SGR sequence has no HTML counterpart
    strip_ansi(&closed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m plain"), "red plain");
        assert_eq!(strip_ansi("\x1b[38;5;196m#\x1b[0m"), "#");
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_visible_length() {
        assert_eq!(visible_length("\x1b[38;5;21m###\x1b[0m  "), 5);
        assert_eq!(visible_length(""), 0);
        assert!(has_ansi("\x1b[0m"));
        assert!(!has_ansi("# #"));
    }

    #[test]
    fn test_palette_cube() {
        assert_eq!(palette_rgb(16).to_hex(), "#000000");
        assert_eq!(palette_rgb(196).to_hex(), "#ff0000");
        assert_eq!(palette_rgb(231).to_hex(), "#ffffff");
        assert_eq!(palette_rgb(1).to_hex(), "#cd0000");
        assert_eq!(palette_rgb(9).to_hex(), "#000000");
    }

    #[test]
    fn test_palette_gray_ramp() {
        assert_eq!(palette_rgb(232).to_hex(), "#080808");
        assert_eq!(palette_rgb(240).to_hex(), "#585858");
        assert_eq!(palette_rgb(255).to_hex(), "#eeeeee");
        assert_eq!(
            ansi_to_html(&format!("{}#{}", crate::color::resolve_color("gray"), RESET)),
            r##"<span style="color:#585858">#</span>"##
        );
    }

    #[test]
    fn test_ansi_to_html() {
        let html = ansi_to_html("\x1b[38;5;196m##\x1b[0m #");
        assert_eq!(html, r##"<span style="color:#ff0000">##</span> #"##);

        let basic = ansi_to_html("\x1b[34m#\x1b[0m");
        assert_eq!(basic, r##"<span style="color:#0000ee">#</span>"##);
    }

    #[test]
    fn test_ansi_to_html_drops_unknown_sequences() {
        assert_eq!(ansi_to_html("\x1b[1m#"), "#");
    }
}
