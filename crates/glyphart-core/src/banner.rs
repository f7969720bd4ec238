//! Banner files and the banner registry
//!
//! A banner file holds one header line followed by 95 blocks, one per
//! character from `' '` to `'~'`. Each block is `height` lines tall and may
//! be followed by a single blank separator line.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::glyph::{Glyph, GlyphTable, CHAR_COUNT, FIRST_CHAR};

/// Number of header lines preceding the first glyph block
const HEADER_LINES: usize = 1;

/// Name of the banner compiled into the crate
pub const BUILTIN_BANNER: &str = "pixel";

const PIXEL_BANNER: &str = include_str!("../banners/pixel.txt");

/// Parse banner file contents into a glyph table of `height` rows per glyph
pub fn parse_banner(content: &str, height: usize) -> Result<GlyphTable> {
    let lines: Vec<&str> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut table = GlyphTable::new(height)?;
    let mut cursor = HEADER_LINES;

    for index in 0..CHAR_COUNT {
        if cursor + height > lines.len() {
            return Err(CoreError::Banner(format!(
                "not enough lines for character {}",
                index
            )));
        }

        let block = &lines[cursor..cursor + height];
        let width = block.iter().map(|row| row.len()).max().unwrap_or(0);
        let rows = block.iter().map(|row| format!("{:<width$}", row, width = width));

        let code = FIRST_CHAR + index as u32;
        let ch = char::from_u32(code).ok_or(CoreError::UnsupportedChar(code))?;
        table.insert(ch, Glyph::new(rows)?)?;

        cursor += height;
        if cursor < lines.len() && lines[cursor].trim().is_empty() {
            cursor += 1;
        }
    }

    Ok(table)
}

/// Read and parse a banner file
pub fn load_banner(path: impl AsRef<Path>, height: usize) -> Result<GlyphTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let table = parse_banner(&content, height)?;
    tracing::debug!("Loaded banner {:?} ({} glyphs)", path, table.len());
    Ok(table)
}

/// The bundled `pixel` banner
pub fn builtin() -> Result<GlyphTable> {
    parse_banner(PIXEL_BANNER, crate::glyph::DEFAULT_HEIGHT)
}

/// Named glyph tables, built up front and read-only while rendering
#[derive(Debug, Clone, Default)]
pub struct BannerRegistry {
    banners: BTreeMap<String, GlyphTable>,
}

impl BannerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the bundled banner
    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.insert(BUILTIN_BANNER, builtin()?);
        Ok(registry)
    }

    /// Register `table` under `name`, replacing any previous entry
    pub fn insert(&mut self, name: impl Into<String>, table: GlyphTable) -> Option<GlyphTable> {
        self.banners.insert(name.into(), table)
    }

    /// Load every `*.txt` banner in `dir`, named by file stem.
    ///
    /// Unreadable or malformed files are skipped with a warning. A missing
    /// directory loads nothing.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>, height: usize) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.exists() {
            tracing::debug!("Banner directory {:?} does not exist", dir);
            return Ok(0);
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut count = 0;
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_banner(&path, height) {
                Ok(table) => {
                    self.insert(name, table);
                    count += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to load banner at {:?}: {}", path, e);
                }
            }
        }

        tracing::debug!("Loaded {} banners from {:?}", count, dir);
        Ok(count)
    }

    /// Look up a banner; a trailing `.txt` is ignored
    pub fn get(&self, name: &str) -> Option<&GlyphTable> {
        let name = name.strip_suffix(".txt").unwrap_or(name);
        self.banners.get(name)
    }

    /// Like [`get`](Self::get), failing with `UnknownBanner`
    pub fn require(&self, name: &str) -> Result<&GlyphTable> {
        self.get(name)
            .ok_or_else(|| CoreError::UnknownBanner(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.banners.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }
}
