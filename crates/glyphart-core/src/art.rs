//! # ASCII Art Generator
//!
//! Turns multi-line text into banner art: every input line is rendered
//! through the color compositor, then aligned.
//!
//! ```text
//! #   #  #
//! #   #
//! #   # ##
//! #####  #
//! #   #  #
//! #   #  #
//! #   # ###
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{ResolvedStyles, StyleRuleSet};
use crate::error::Result;
use crate::glyph::{GlyphTable, RenderedBlock};
use crate::layout::{justify, layout, Align, LayoutSpec, WidthPolicy};
use crate::notice::{Notice, Outcome};

/// Configuration for ASCII art generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiArtConfig {
    /// Horizontal alignment of every line
    pub align: Align,
    /// Target width in columns
    pub width: usize,
    /// Behavior when a line is wider than `width`
    pub policy: WidthPolicy,
}

impl Default for AsciiArtConfig {
    fn default() -> Self {
        Self {
            align: Align::Left,
            width: 80,
            policy: WidthPolicy::Clamp,
        }
    }
}

impl AsciiArtConfig {
    fn layout_spec(&self) -> LayoutSpec {
        LayoutSpec {
            align: self.align,
            width: self.width,
            policy: self.policy,
        }
    }
}

/// ASCII art generator
#[derive(Debug, Clone, Default)]
pub struct AsciiArtGenerator {
    config: AsciiArtConfig,
}

impl AsciiArtGenerator {
    /// Create a new generator with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: AsciiArtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AsciiArtConfig {
        &self.config
    }

    /// Render `text` into output rows.
    ///
    /// Each non-empty line becomes `table.height()` rows; an empty line
    /// becomes a single empty row. A final newline does not add a line.
    pub fn from_text(
        &self,
        text: &str,
        table: &GlyphTable,
        rules: &StyleRuleSet,
    ) -> Result<Outcome<Vec<String>>> {
        let Outcome {
            value: styles,
            mut notices,
        } = rules.resolve();

        let mut rows = Vec::new();
        for line in split_lines(text) {
            if line.is_empty() {
                rows.push(String::new());
                continue;
            }
            let block = self.render_line(line, table, &styles, &mut notices)?;
            rows.extend(block);
        }

        Ok(Outcome::with_notices(rows, notices))
    }

    fn render_line(
        &self,
        line: &str,
        table: &GlyphTable,
        styles: &ResolvedStyles,
        notices: &mut Vec<Notice>,
    ) -> Result<Vec<String>> {
        if self.config.align == Align::Justify {
            let outcome =
                justify(line, table, styles, self.config.width)?.map(RenderedBlock::into_rows);
            notices.extend(outcome.notices);
            return Ok(outcome.value);
        }

        let block = styles.render(line, table)?;
        Ok(layout(block, &self.config.layout_spec())?.into_rows())
    }
}

/// Logical input lines: `\r` removed, split on `\n`, without the empty
/// segment a trailing newline would leave.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
