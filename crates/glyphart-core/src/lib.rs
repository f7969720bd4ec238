//! # glyphart Core
//!
//! The bidirectional glyph codec behind glyphart.
//!
//! This crate provides:
//! - Banner loading and a read-only banner registry
//! - Block rendering of text into fixed-height glyph rows
//! - Per-substring color styling with deterministic conflict resolution
//! - Left, right, center and word-justified layout
//! - Reverse decoding of rendered art back into text
//! - ANSI stripping, ANSI to HTML and document export
//!
//! Codec calls are pure and never log. Non-fatal diagnostics come back as
//! [`Notice`]s next to the result.
//!
//! ```text
//! #### #    #   #
//! #    #     # #
//! # ## #      #
//! #  # #      #
//! #### ####   #
//! ```

pub mod ansi;
pub mod art;
pub mod banner;
pub mod color;
pub mod error;
pub mod export;
pub mod glyph;
pub mod layout;
pub mod notice;
pub mod render;
pub mod reverse;

pub use ansi::{ansi_to_html, strip_ansi, visible_length};
pub use art::{AsciiArtConfig, AsciiArtGenerator};
pub use banner::{load_banner, parse_banner, BannerRegistry, BUILTIN_BANNER};
pub use color::{render_colored, resolve_color, ColorSpec, ResolvedStyles, StyleRule, StyleRuleSet};
pub use error::{CoreError, Result};
pub use export::{export, output_path, ExportFormat};
pub use glyph::{Glyph, GlyphTable, RenderedBlock};
pub use layout::{justify, layout, Align, LayoutSpec, WidthPolicy};
pub use notice::{Notice, Outcome};
pub use render::render;
pub use reverse::decode;

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a registry with the bundled banner plus every banner in `dir`
pub fn init(dir: Option<&std::path::Path>, height: usize) -> Result<BannerRegistry> {
    tracing::debug!("Initializing glyphart core v{}", VERSION);
    let mut registry = BannerRegistry::with_builtin()?;
    if let Some(dir) = dir {
        registry.load_dir(dir, height)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pixel() -> GlyphTable {
        banner::builtin().unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_tables_are_thread_safe() {
        assert_send_sync::<GlyphTable>();
        assert_send_sync::<BannerRegistry>();
        assert_send_sync::<ResolvedStyles>();

        let table = std::sync::Arc::new(pixel());
        let handles: Vec<_> = ["Hi", "ok"]
            .into_iter()
            .map(|text| {
                let table = std::sync::Arc::clone(&table);
                std::thread::spawn(move || render(text, &table).map(|b| decode(b.rows(), &table)))
            })
            .collect();
        for (handle, text) in handles.into_iter().zip(["Hi", "ok"]) {
            assert_eq!(handle.join().unwrap().unwrap(), text);
        }
    }

    #[test]
    fn test_init() {
        let registry = init(None, glyph::DEFAULT_HEIGHT).unwrap();
        assert!(registry.get(BUILTIN_BANNER).is_some());
    }

    #[test]
    fn test_hi_on_builtin_banner() {
        let table = pixel();
        let block = render("Hi", &table).unwrap();
        assert_eq!(block.height(), 8);
        let expected = table.lookup('H').unwrap().width() + table.lookup('i').unwrap().width();
        assert_eq!(block.visible_width(), expected);
        assert_eq!(expected, 10);
    }

    #[test]
    fn test_builtin_round_trip() {
        let table = pixel();
        for text in [
            "Hello World",
            "Hi",
            "hello there",
            "{Hello} [World]!",
            "abc def",
            "The quick brown fox",
            "1 + 2 = 3",
        ] {
            let block = render(text, &table).unwrap();
            assert_eq!(decode(block.rows(), &table), text, "round trip of {:?}", text);
        }
    }

    #[test]
    fn test_builtin_round_trip_all_pairs() {
        let table = pixel();
        let printable: Vec<char> = (' '..='~').collect();
        for &a in &printable {
            for &b in &printable {
                let text: String = [a, b].iter().collect();
                let block = render(&text, &table).unwrap();
                assert_eq!(decode(block.rows(), &table), text.trim_end());
            }
        }
    }

    #[test]
    fn test_colored_round_trip() {
        let table = pixel();
        let rules: StyleRuleSet = vec![
            StyleRule::whole_line("hsl(200, 80%, 60%)"),
            StyleRule::new("red", "lo"),
        ]
        .into();
        let outcome = render_colored("Hello", &table, &rules).unwrap();
        assert_eq!(decode(outcome.value.rows(), &table), "Hello");
    }

    #[test]
    fn test_blank_block_decodes_empty() {
        let rows = vec![String::new(); 8];
        assert_eq!(decode(&rows, &pixel()), "");
    }
}
