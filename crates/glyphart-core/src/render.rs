//! Block renderer
//!
//! Concatenates glyphs row by row: row `r` of the output is row `r` of every
//! character's glyph, left to right.

use crate::error::Result;
use crate::glyph::{GlyphTable, RenderedBlock};

/// Render one line of text into a block of `table.height()` rows.
///
/// Fails with `UnsupportedChar` on the first character the table cannot
/// render; no partial output is returned. An empty line yields empty rows.
pub fn render(line: &str, table: &GlyphTable) -> Result<RenderedBlock> {
    let mut block = RenderedBlock::empty(table.height());
    for ch in line.chars() {
        block.push_glyph(table.lookup(ch)?);
    }
    Ok(block)
}
