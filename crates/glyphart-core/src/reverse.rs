//! Reverse decoder
//!
//! Recovers text from rendered rows. Rows are cut into chunks of the table
//! height; within a chunk glyphs are matched greedily from the left. When
//! several glyphs match at the same position the widest wins, then the one
//! with the lowest character code.

use crate::ansi::strip_ansi;
use crate::glyph::{Glyph, GlyphTable};

/// Decode rendered rows back into text, one output line per chunk of
/// `table.height()` rows.
///
/// Escapes and carriage returns are ignored. Columns no glyph accounts for
/// decode as spaces; trailing spaces are trimmed from every line.
pub fn decode<S: AsRef<str>>(rows: &[S], table: &GlyphTable) -> String {
    let height = table.height();
    let candidates = candidates(table);

    let mut rows: Vec<String> = rows
        .iter()
        .map(|row| strip_ansi(row.as_ref()).replace('\r', ""))
        .collect();
    let short = rows.len() % height;
    if short != 0 {
        rows.resize(rows.len() + height - short, String::new());
    }

    rows.chunks(height)
        .map(|chunk| decode_chunk(chunk, &candidates))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Glyphs in match priority order
fn candidates(table: &GlyphTable) -> Vec<(char, &Glyph)> {
    let mut glyphs: Vec<(char, &Glyph)> = table
        .iter()
        .filter(|(_, glyph)| glyph.width() > 0)
        .collect();
    glyphs.sort_by(|(a, ga), (b, gb)| gb.width().cmp(&ga.width()).then(a.cmp(b)));
    glyphs
}

fn decode_chunk(chunk: &[String], candidates: &[(char, &Glyph)]) -> String {
    let mut remaining: Vec<&str> = chunk.iter().map(String::as_str).collect();
    let mut text = String::new();

    loop {
        if remaining.iter().all(|row| row.trim().is_empty()) {
            break;
        }

        let matched = candidates.iter().find(|(_, glyph)| {
            remaining
                .iter()
                .zip(glyph.rows())
                .all(|(row, part)| row.starts_with(part.as_str()))
        });

        match matched {
            Some((ch, glyph)) => {
                text.push(*ch);
                for row in &mut remaining {
                    *row = &row[glyph.width()..];
                }
            }
            None => {
                text.push(' ');
                for row in &mut remaining {
                    let skip = row.chars().next().map_or(0, char::len_utf8);
                    *row = &row[skip..];
                }
            }
        }
    }

    text.trim_end_matches(' ').to_string()
}
