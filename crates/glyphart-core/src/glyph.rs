//! Glyphs, glyph tables and rendered blocks
//!
//! A [`GlyphTable`] maps every supported character (printable ASCII,
//! `' '..='~'`) to a [`Glyph`]: a fixed number of equally wide text rows.
//! All glyphs of one table share the same height; widths vary per glyph.
//!
//! ```text
//!  #   #   #
//!  #   #
//!  #   #  ##
//!  #####   #
//!  #   #   #
//!  #   #   #
//!  #   #  ###
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::ansi::{self, RESET};
use crate::error::{CoreError, Result};

/// First supported character code (space)
pub const FIRST_CHAR: u32 = 32;
/// Last supported character code (tilde)
pub const LAST_CHAR: u32 = 126;
/// Number of characters a complete banner defines
pub const CHAR_COUNT: usize = (LAST_CHAR - FIRST_CHAR + 1) as usize;
/// Glyph height used by the stock banners
pub const DEFAULT_HEIGHT: usize = 8;

/// Whether `ch` falls inside the printable range a glyph table can hold
pub fn is_supported(ch: char) -> bool {
    (FIRST_CHAR..=LAST_CHAR).contains(&(ch as u32))
}

/// One character's artwork: `height` rows of identical width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    rows: Vec<String>,
    width: usize,
}

impl Glyph {
    /// Build a glyph from its rows.
    ///
    /// Rows must be printable ASCII and all of the same length.
    pub fn new<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
        if rows.is_empty() {
            return Err(CoreError::InvalidGlyph("glyph has no rows".to_string()));
        }

        if let Some(bad) = rows
            .iter()
            .flat_map(|row| row.chars())
            .find(|&ch| !is_supported(ch))
        {
            return Err(CoreError::InvalidGlyph(format!(
                "glyph row contains non-printable character {:?}",
                bad
            )));
        }

        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(CoreError::InvalidGlyph(format!(
                "ragged glyph rows (expected width {})",
                width
            )));
        }

        Ok(Self { rows, width })
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// A single row
    pub fn row(&self, index: usize) -> &str {
        &self.rows[index]
    }
}

/// Mapping from supported characters to glyphs of one shared height
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    height: usize,
    glyphs: BTreeMap<char, Glyph>,
}

impl GlyphTable {
    /// Create an empty table whose glyphs will all be `height` rows tall
    pub fn new(height: usize) -> Result<Self> {
        if height == 0 {
            return Err(CoreError::InvalidGlyph(
                "glyph height must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            height,
            glyphs: BTreeMap::new(),
        })
    }

    /// Build a table from `(char, rows)` pairs
    pub fn from_glyphs<I, R, S>(height: usize, glyphs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, R)>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(height)?;
        for (ch, rows) in glyphs {
            table.insert(ch, Glyph::new(rows)?)?;
        }
        Ok(table)
    }

    /// Add or replace the glyph for `ch`, returning the previous one
    pub fn insert(&mut self, ch: char, glyph: Glyph) -> Result<Option<Glyph>> {
        if !is_supported(ch) {
            return Err(CoreError::UnsupportedChar(ch as u32));
        }
        if glyph.height() != self.height {
            return Err(CoreError::InvalidGlyph(format!(
                "glyph for {:?} has {} rows, table height is {}",
                ch,
                glyph.height(),
                self.height
            )));
        }
        Ok(self.glyphs.insert(ch, glyph))
    }

    /// Glyph height shared by every entry
    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph for `ch`, if defined
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Glyph for `ch`, or `UnsupportedChar` when the table cannot render it
    pub fn lookup(&self, ch: char) -> Result<&Glyph> {
        if !is_supported(ch) {
            return Err(CoreError::UnsupportedChar(ch as u32));
        }
        self.glyphs
            .get(&ch)
            .ok_or(CoreError::UnsupportedChar(ch as u32))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Whether every printable character has a glyph
    pub fn is_complete(&self) -> bool {
        self.glyphs.len() == CHAR_COUNT
    }

    /// Entries in ascending character order
    pub fn iter(&self) -> impl Iterator<Item = (char, &Glyph)> {
        self.glyphs.iter().map(|(ch, glyph)| (*ch, glyph))
    }
}

/// One logical text line rendered into `height` rows.
///
/// Rows may carry embedded color escapes; their visible widths are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    rows: Vec<String>,
}

impl RenderedBlock {
    /// A block of `height` empty rows
    pub fn empty(height: usize) -> Self {
        Self {
            rows: vec![String::new(); height],
        }
    }

    /// Wrap already rendered rows
    pub fn from_rows(rows: Vec<String>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Visible column count, ignoring color escapes
    pub fn visible_width(&self) -> usize {
        self.rows.first().map_or(0, |row| ansi::visible_length(row))
    }

    /// Append a glyph's rows to the right edge
    pub(crate) fn push_glyph(&mut self, glyph: &Glyph) {
        for (row, part) in self.rows.iter_mut().zip(glyph.rows()) {
            row.push_str(part);
        }
    }

    /// Append another block to the right edge, wrapped in `escape` + reset.
    ///
    /// An empty escape, or an empty block, appends the rows unwrapped.
    pub(crate) fn push_block(&mut self, other: &RenderedBlock, escape: &str) {
        for (row, part) in self.rows.iter_mut().zip(other.rows()) {
            // Nothing visible to color
            if escape.is_empty() || part.is_empty() {
                row.push_str(part);
            } else {
                row.push_str(escape);
                row.push_str(part);
                row.push_str(RESET);
            }
        }
    }

    /// Append `count` spaces to every row
    pub(crate) fn push_spaces(&mut self, count: usize) {
        let pad = " ".repeat(count);
        for row in &mut self.rows {
            row.push_str(&pad);
        }
    }

    /// Prepend `count` spaces to every row
    pub(crate) fn pad_left(mut self, count: usize) -> Self {
        if count > 0 {
            let pad = " ".repeat(count);
            for row in &mut self.rows {
                row.insert_str(0, &pad);
            }
        }
        self
    }
}

impl fmt::Display for RenderedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rows.join("\n"))
    }
}
