//! Line layout: alignment and word justification

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ResolvedStyles;
use crate::error::{CoreError, Result};
use crate::glyph::{GlyphTable, RenderedBlock};
use crate::notice::{Notice, Outcome};

/// Horizontal alignment of a rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "right" => Ok(Align::Right),
            "center" | "centre" => Ok(Align::Center),
            "justify" => Ok(Align::Justify),
            other => Err(format!(
                "unknown alignment '{}' (expected left, right, center or justify)",
                other
            )),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Align::Left => "left",
            Align::Right => "right",
            Align::Center => "center",
            Align::Justify => "justify",
        };
        f.write_str(name)
    }
}

/// What to do when the target width is narrower than the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthPolicy {
    /// Fail with `WidthTooSmall`
    Strict,
    /// Pad nothing and leave the content as is
    #[default]
    Clamp,
}

impl FromStr for WidthPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(WidthPolicy::Strict),
            "clamp" => Ok(WidthPolicy::Clamp),
            other => Err(format!(
                "unknown width policy '{}' (expected strict or clamp)",
                other
            )),
        }
    }
}

/// Alignment, target width and width policy for one layout call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub align: Align,
    pub width: usize,
    pub policy: WidthPolicy,
}

impl LayoutSpec {
    pub fn new(align: Align, width: usize) -> Self {
        Self {
            align,
            width,
            policy: WidthPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WidthPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Align an already rendered block.
///
/// Left is the identity. Justify needs word boundaries the block no longer
/// has, so it is also the identity here; see [`justify`].
pub fn layout(block: RenderedBlock, spec: &LayoutSpec) -> Result<RenderedBlock> {
    let divisor = match spec.align {
        Align::Left | Align::Justify => return Ok(block),
        Align::Right => 1,
        Align::Center => 2,
    };

    let visible = block.visible_width();
    if spec.width < visible && spec.policy == WidthPolicy::Strict {
        return Err(CoreError::WidthTooSmall {
            width: spec.width,
            required: visible,
        });
    }

    let pad = spec.width.saturating_sub(visible) / divisor;
    Ok(block.pad_left(pad))
}

/// Split `extra` columns across `slots` gaps, larger gaps first.
///
/// Gap sizes sum to `extra` and differ by at most one.
pub fn distribute_gaps(extra: usize, slots: usize) -> Vec<usize> {
    if slots == 0 {
        return Vec::new();
    }
    let base = extra / slots;
    let remainder = extra % slots;
    (0..slots)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Render `line` so its words spread across exactly `width` columns.
///
/// Each word is rendered with `styles`. Lines with fewer than two words, or
/// whose words already fill the width, are rendered left-aligned instead.
/// A non-empty line with fewer than two words also raises a
/// [`Notice::JustifyFallback`].
pub fn justify(
    line: &str,
    table: &GlyphTable,
    styles: &ResolvedStyles,
    width: usize,
) -> Result<Outcome<RenderedBlock>> {
    let words: Vec<&str> = line.split(' ').filter(|w| !w.is_empty()).collect();

    if words.len() < 2 {
        let block = styles.render(line, table)?;
        let notices = if !line.is_empty() {
            vec![Notice::JustifyFallback {
                line: line.to_string(),
            }]
        } else {
            Vec::new()
        };
        return Ok(Outcome::with_notices(block, notices));
    }

    let rendered = words
        .iter()
        .map(|word| styles.render(word, table))
        .collect::<Result<Vec<_>>>()?;
    let total: usize = rendered.iter().map(RenderedBlock::visible_width).sum();

    if width <= total {
        return Ok(Outcome::new(styles.render(line, table)?));
    }

    let gaps = distribute_gaps(width - total, rendered.len() - 1);
    let mut out = RenderedBlock::empty(table.height());
    for (idx, word) in rendered.iter().enumerate() {
        if idx > 0 {
            out.push_spaces(gaps[idx - 1]);
        }
        out.push_block(word, "");
    }
    Ok(Outcome::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{StyleRule, StyleRuleSet};
    use crate::render::render;
    use crate::render::tests::small_table;
    use pretty_assertions::assert_eq;

    fn block(rows: &[&str]) -> RenderedBlock {
        RenderedBlock::from_rows(rows.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn test_left_is_identity() {
        let b = block(&["ab", "cd"]);
        let spec = LayoutSpec::new(Align::Left, 1).with_policy(WidthPolicy::Strict);
        let once = layout(b.clone(), &spec).unwrap();
        assert_eq!(once, b);
        assert_eq!(layout(once.clone(), &spec).unwrap(), once);
    }

    #[test]
    fn test_right_and_center_padding() {
        let b = block(&["ab", "cd"]);
        let right = layout(b.clone(), &LayoutSpec::new(Align::Right, 5)).unwrap();
        assert_eq!(right.rows(), &["   ab".to_string(), "   cd".to_string()]);

        let center = layout(b, &LayoutSpec::new(Align::Center, 7)).unwrap();
        assert_eq!(center.rows()[0], "  ab");
    }

    #[test]
    fn test_padding_ignores_escapes() {
        let b = block(&["\x1b[31mab\x1b[0m"]);
        let right = layout(b, &LayoutSpec::new(Align::Right, 4)).unwrap();
        assert_eq!(right.rows()[0], "  \x1b[31mab\x1b[0m");
    }

    #[test]
    fn test_strict_width_too_small() {
        let b = block(&["abcd"]);
        let spec = LayoutSpec::new(Align::Center, 3).with_policy(WidthPolicy::Strict);
        let err = layout(b, &spec).unwrap_err();
        assert!(matches!(
            err,
            CoreError::WidthTooSmall {
                width: 3,
                required: 4
            }
        ));
    }

    #[test]
    fn test_clamp_pads_nothing() {
        let b = block(&["abcd"]);
        let spec = LayoutSpec::new(Align::Right, 3).with_policy(WidthPolicy::Clamp);
        assert_eq!(layout(b.clone(), &spec).unwrap(), b);
        assert_eq!(LayoutSpec::default().policy, WidthPolicy::Clamp);
    }

    #[test]
    fn test_distribute_gaps() {
        assert_eq!(distribute_gaps(7, 3), vec![3, 2, 2]);
        assert_eq!(distribute_gaps(3, 1), vec![3]);
        assert_eq!(distribute_gaps(0, 2), vec![0, 0]);
        assert!(distribute_gaps(5, 0).is_empty());

        for extra in 0..40 {
            for slots in 1..9 {
                let gaps = distribute_gaps(extra, slots);
                assert_eq!(gaps.iter().sum::<usize>(), extra);
                let max = gaps.iter().max().unwrap();
                let min = gaps.iter().min().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn test_justify_two_words() {
        let table = GlyphTable::from_glyphs(
            1,
            [(' ', vec![" "]), ('a', vec!["aaaa"]), ('b', vec!["bbb"])],
        )
        .unwrap();
        let outcome = justify("a b", &table, &ResolvedStyles::plain(), 10).unwrap();
        assert_eq!(outcome.value.rows()[0], "aaaa   bbb");
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_justify_spreads_all_rows() {
        let table = small_table();
        let outcome = justify("a b c", &table, &ResolvedStyles::plain(), 14).unwrap();
        // 9 columns of words, 5 spare over 2 gaps
        assert_eq!(
            outcome.value.rows(),
            &[
                "aa    b    cc ".to_string(),
                "a a   bb   c  ".to_string(),
                "aa    bb   cc ".to_string(),
            ]
        );
        assert_eq!(outcome.value.visible_width(), 14);
    }

    #[test]
    fn test_justify_single_word_falls_back() {
        let table = small_table();
        let outcome = justify("ab", &table, &ResolvedStyles::plain(), 20).unwrap();
        assert_eq!(outcome.value, render("ab", &table).unwrap());
        assert_eq!(
            outcome.notices,
            vec![Notice::JustifyFallback { line: "ab".into() }]
        );
    }

    #[test]
    fn test_justify_blank_line_falls_back() {
        let table = small_table();
        let outcome = justify("   ", &table, &ResolvedStyles::plain(), 20).unwrap();
        assert_eq!(outcome.value, render("   ", &table).unwrap());
        assert_eq!(
            outcome.notices,
            vec![Notice::JustifyFallback { line: "   ".into() }]
        );

        let empty = justify("", &table, &ResolvedStyles::plain(), 20).unwrap();
        assert!(empty.is_clean());
    }

    #[test]
    fn test_justify_too_narrow_renders_left() {
        let table = small_table();
        let outcome = justify("a b", &table, &ResolvedStyles::plain(), 4).unwrap();
        assert_eq!(outcome.value, render("a b", &table).unwrap());
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_justify_keeps_word_colors() {
        let table = small_table();
        let rules: StyleRuleSet = vec![StyleRule::new("red", "b")].into();
        let styles = rules.resolve().value;
        let outcome = justify("a b", &table, &styles, 8).unwrap();
        assert_eq!(outcome.value.rows()[0], "aa   \x1b[31mb  \x1b[0m");
    }

    #[test]
    fn test_align_from_str() {
        assert_eq!("Center".parse::<Align>().unwrap(), Align::Center);
        assert_eq!("justify".parse::<Align>().unwrap(), Align::Justify);
        assert!("middle".parse::<Align>().is_err());
        assert_eq!(Align::Right.to_string(), "right");
        assert_eq!("clamp".parse::<WidthPolicy>().unwrap(), WidthPolicy::Clamp);
    }
}
