//! Color compositor
//!
//! Style rules pair a color with a substring. An empty substring styles
//! "the rest of the line". Rendering scans the line left to right; at each
//! position the surviving substring rules are tried in the order they were
//! given and the first prefix match wins. Unmatched characters take the
//! whole-line color if there is one.
//!
//! Supported color notations:
//! - names: `red`, `blue`, `orange`, `grey`, ...
//! - `#rrggbb`
//! - `rgb(r, g, b)`
//! - `hsl(h, s%, l%)`
//!
//! Anything unrecognized renders unstyled rather than failing.

use std::collections::HashMap;

use palette::{FromColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

use crate::ansi::foreground_256;
use crate::error::Result;
use crate::glyph::{GlyphTable, RenderedBlock};
use crate::notice::{Notice, Outcome};
use crate::render::render;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#RRGGBB"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Lowercase "#rrggbb"
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert HSL (hue in degrees, saturation and lightness in 0.0-1.0)
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hsl: Hsl = Hsl::new(hue.rem_euclid(360.0), saturation, lightness);
        let rgb: Srgb<u8> = Srgb::from_color(hsl).into_format();
        Self::new(rgb.red, rgb.green, rgb.blue)
    }

    /// Nearest entry of the 6x6x6 color cube (indexes 16-231)
    pub fn to_ansi_256(self) -> u8 {
        let level = |v: u8| (v as u32 * 6 / 256) as u8;
        16 + 36 * level(self.r) + 6 * level(self.g) + level(self.b)
    }
}

/// A parsed color notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    /// One of the eight basic SGR foregrounds (30-37)
    Basic(u8),
    /// A fixed 256-color palette entry
    Indexed(u8),
    /// `#rrggbb` or `rgb(r, g, b)`
    Rgb(Rgb),
    /// `hsl(h, s%, l%)`, saturation and lightness in percent
    Hsl { hue: i32, saturation: u8, lightness: u8 },
}

impl ColorSpec {
    /// Parse a color notation, `None` when it is not recognized
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim().to_ascii_lowercase();

        if let Some(named) = Self::named(&spec) {
            return Some(named);
        }
        if spec.starts_with('#') {
            return Rgb::from_hex(&spec).map(ColorSpec::Rgb);
        }
        if let Some([r, g, b]) = function_args(&spec, "rgb") {
            let r = r.parse::<u8>().ok()?;
            let g = g.parse::<u8>().ok()?;
            let b = b.parse::<u8>().ok()?;
            return Some(ColorSpec::Rgb(Rgb::new(r, g, b)));
        }
        if let Some([h, s, l]) = function_args(&spec, "hsl") {
            let hue = h.parse::<i32>().ok()?;
            let saturation = percent(s)?;
            let lightness = percent(l)?;
            return Some(ColorSpec::Hsl {
                hue,
                saturation,
                lightness,
            });
        }
        None
    }

    fn named(name: &str) -> Option<Self> {
        let spec = match name {
            "black" => ColorSpec::Basic(30),
            "red" => ColorSpec::Basic(31),
            "green" => ColorSpec::Basic(32),
            "yellow" => ColorSpec::Basic(33),
            "blue" => ColorSpec::Basic(34),
            "magenta" => ColorSpec::Basic(35),
            "cyan" => ColorSpec::Basic(36),
            "white" => ColorSpec::Basic(37),
            "orange" => ColorSpec::Indexed(208),
            "pink" => ColorSpec::Indexed(205),
            "purple" => ColorSpec::Indexed(93),
            "gray" | "grey" => ColorSpec::Indexed(240),
            "brown" => ColorSpec::Indexed(94),
            _ => return None,
        };
        Some(spec)
    }

    /// Terminal escape selecting this color as foreground
    pub fn escape(&self) -> String {
        match *self {
            ColorSpec::Basic(code) => format!("\x1b[{}m", code),
            ColorSpec::Indexed(index) => foreground_256(index),
            ColorSpec::Rgb(rgb) => foreground_256(rgb.to_ansi_256()),
            ColorSpec::Hsl {
                hue,
                saturation,
                lightness,
            } => {
                let rgb = Rgb::from_hsl(
                    hue as f32,
                    saturation as f32 / 100.0,
                    lightness as f32 / 100.0,
                );
                foreground_256(rgb.to_ansi_256())
            }
        }
    }
}

/// Split `name(a, b, c)` into its three trimmed arguments
fn function_args<'a>(spec: &'a str, name: &str) -> Option<[&'a str; 3]> {
    let body = spec.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = body.split(',').map(str::trim);
    let args = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(args)
}

fn percent(value: &str) -> Option<u8> {
    let value = value.strip_suffix('%').unwrap_or(value).trim_end();
    value.parse::<u8>().ok().filter(|v| *v <= 100)
}

/// Escape sequence for a color notation, or `""` when it is not recognized
pub fn resolve_color(spec: &str) -> String {
    ColorSpec::parse(spec)
        .map(|color| color.escape())
        .unwrap_or_default()
}

/// A color applied to every occurrence of a substring.
///
/// An empty substring is the whole-line default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub color: String,
    pub substring: String,
}

impl StyleRule {
    pub fn new(color: impl Into<String>, substring: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            substring: substring.into(),
        }
    }

    /// A rule coloring everything no substring rule claims
    pub fn whole_line(color: impl Into<String>) -> Self {
        Self::new(color, "")
    }

    pub fn is_default(&self) -> bool {
        self.substring.is_empty()
    }
}

/// Style rules in caller order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleRuleSet {
    rules: Vec<StyleRule>,
}

impl StyleRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve duplicates: the last default and the last rule per substring
    /// survive. Each conflict is reported as a notice.
    pub fn resolve(&self) -> Outcome<ResolvedStyles> {
        let mut notices = Vec::new();

        let defaults: Vec<&StyleRule> = self.rules.iter().filter(|r| r.is_default()).collect();
        if defaults.len() > 1 {
            notices.push(Notice::DuplicateDefaultColor {
                count: defaults.len(),
            });
        }
        let default = defaults.last().map(|rule| resolve_color(&rule.color));

        let mut last_index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.is_default() {
                continue;
            }
            last_index.insert(&rule.substring, idx);
            match counts.iter_mut().find(|(s, _)| *s == rule.substring) {
                Some((_, count)) => *count += 1,
                None => counts.push((&rule.substring, 1)),
            }
        }
        notices.extend(
            counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(substring, count)| Notice::DuplicateSubstringRule {
                    substring: substring.to_string(),
                    count,
                }),
        );

        let substrings = self
            .rules
            .iter()
            .enumerate()
            .filter(|(idx, rule)| !rule.is_default() && last_index[rule.substring.as_str()] == *idx)
            .map(|(_, rule)| ResolvedRule {
                substring: rule.substring.clone(),
                escape: resolve_color(&rule.color),
            })
            .collect();

        let whole_line_only = self.rules.len() == 1 && self.rules[0].is_default();

        Outcome::with_notices(
            ResolvedStyles {
                default,
                substrings,
                whole_line_only,
            },
            notices,
        )
    }
}

impl From<Vec<StyleRule>> for StyleRuleSet {
    fn from(rules: Vec<StyleRule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<StyleRule> for StyleRuleSet {
    fn from_iter<I: IntoIterator<Item = StyleRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedRule {
    substring: String,
    escape: String,
}

/// Style rules after duplicate resolution, ready to render any number of
/// lines without re-reporting conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedStyles {
    default: Option<String>,
    substrings: Vec<ResolvedRule>,
    whole_line_only: bool,
}

impl ResolvedStyles {
    /// Styles that leave every line unstyled
    pub fn plain() -> Self {
        Self::default()
    }

    /// Escape of the surviving whole-line rule, if any
    pub fn default_escape(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Render `line`, wrapping matched substrings and default-colored runs
    /// in their escapes.
    pub fn render(&self, line: &str, table: &GlyphTable) -> Result<RenderedBlock> {
        let height = table.height();
        let default_escape = self.default_escape().unwrap_or("");

        if self.whole_line_only {
            let block = render(line, table)?;
            let mut out = RenderedBlock::empty(height);
            out.push_block(&block, default_escape);
            return Ok(out);
        }

        let mut out = RenderedBlock::empty(height);
        // Consecutive unmatched characters share one escape/reset pair
        let mut run = RenderedBlock::empty(height);
        let mut run_open = false;
        let mut cursor = 0;

        while cursor < line.len() {
            let rest = &line[cursor..];

            if let Some(rule) = self.substrings.iter().find(|r| rest.starts_with(&r.substring)) {
                if run_open {
                    out.push_block(&run, default_escape);
                    run = RenderedBlock::empty(height);
                    run_open = false;
                }
                let segment = render(&rule.substring, table)?;
                out.push_block(&segment, &rule.escape);
                cursor += rule.substring.len();
                continue;
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };
            run.push_glyph(table.lookup(ch)?);
            run_open = true;
            cursor += ch.len_utf8();
        }

        if run_open {
            out.push_block(&run, default_escape);
        }
        Ok(out)
    }
}

/// Render `line` with `rules` applied, returning any rule conflicts as
/// notices.
pub fn render_colored(
    line: &str,
    table: &GlyphTable,
    rules: &StyleRuleSet,
) -> Result<Outcome<RenderedBlock>> {
    let Outcome { value: styles, notices } = rules.resolve();
    let block = styles.render(line, table)?;
    Ok(Outcome::with_notices(block, notices))
}
