//! glyphart - block-letter banners from text, and text back from banners
//!
//! ```text
//! #### #    #   #
//! #    #     # #
//! # ## #      #
//! #  # #      #
//! #### ####   #
//! ```

mod term;

use anyhow::Context;
use clap::Parser;
use glyphart_config::{Config, ConfigManager};
use glyphart_core::{
    ansi::has_ansi, decode, export, load_banner, output_path, Align, AsciiArtConfig,
    AsciiArtGenerator, BannerRegistry, ExportFormat, GlyphTable, StyleRule, StyleRuleSet,
    WidthPolicy,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// glyphart - render text as ASCII-art banners
#[derive(Parser, Debug)]
#[command(name = "glyphart")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to render; a literal \n starts a new line
    #[arg(required_unless_present = "reverse")]
    text: Option<String>,

    /// Banner name or path to a banner file
    banner: Option<String>,

    /// Alignment: left, right, center or justify
    #[arg(short, long)]
    align: Option<Align>,

    /// Color rule, repeatable; without SUBSTRING the whole line is colored
    #[arg(short = 'c', long = "color", value_name = "COLOR[:SUBSTRING]")]
    colors: Vec<String>,

    /// Target width in columns (defaults to the terminal width)
    #[arg(short, long)]
    width: Option<usize>,

    /// Ignore widths narrower than the art instead of failing
    #[arg(long)]
    clamp: bool,

    /// Write the art to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: ansi, txt, html, json or svg
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Decode a rendered banner file back into text
    #[arg(short, long, value_name = "FILE")]
    reverse: Option<PathBuf>,

    /// Directory of additional banner files
    #[arg(long)]
    banner_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging; stdout is reserved for the art
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("glyphart={}", log_level)),
        ))
        .init();

    tracing::debug!("Starting glyphart v{}", env!("CARGO_PKG_VERSION"));

    let manager = match &args.config {
        Some(path) => ConfigManager::load_from(path)?,
        None => ConfigManager::load()?,
    };
    let config = manager.config();

    let banner_dir = args.banner_dir.clone().or_else(|| config.banners.dir.clone());
    let registry = glyphart_core::init(banner_dir.as_deref(), config.banners.height)?;
    tracing::debug!(
        "Banners available: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );

    if let Some(ref path) = args.reverse {
        // The only positional names the banner when decoding
        let name = args.banner.as_deref().or(args.text.as_deref());
        let table = resolve_banner(&registry, name, config)?;
        return reverse(path, &table);
    }

    let table = resolve_banner(&registry, args.banner.as_deref(), config)?;
    let text = unescape_newlines(args.text.as_deref().unwrap_or_default());
    let rules: StyleRuleSet = args
        .colors
        .iter()
        .map(String::as_str)
        .map(parse_color_arg)
        .collect();

    let generator = AsciiArtGenerator::with_config(art_config(&args, config));
    let outcome = generator.from_text(&text, &table, &rules)?;
    for notice in &outcome.notices {
        tracing::warn!("{}", notice);
    }
    let rows = outcome.value;

    match args.output {
        Some(ref path) => write_output(path, &rows, args.format, config),
        None => {
            print!("{}", export(&rows, args.format.unwrap_or(ExportFormat::Ansi)));
            Ok(())
        }
    }
}

/// Layout settings from flags, then config, then the terminal
fn art_config(args: &Args, config: &Config) -> AsciiArtConfig {
    let width = args
        .width
        .or(config.render.width)
        .unwrap_or_else(term::terminal_width);
    let policy = if args.clamp {
        WidthPolicy::Clamp
    } else {
        config.render.width_policy
    };

    AsciiArtConfig {
        align: args.align.unwrap_or(config.render.align),
        width,
        policy,
    }
}

/// Look a banner up by name, falling back to reading it as a file path
fn resolve_banner(
    registry: &BannerRegistry,
    name: Option<&str>,
    config: &Config,
) -> anyhow::Result<GlyphTable> {
    let name = name.unwrap_or(config.render.banner.as_str());
    if let Some(table) = registry.get(name) {
        return Ok(table.clone());
    }

    let path = Path::new(name);
    if path.is_file() {
        return load_banner(path, config.banners.height)
            .with_context(|| format!("Failed to load banner file {:?}", path));
    }

    Ok(registry.require(name)?.clone())
}

fn reverse(path: &Path, table: &GlyphTable) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let rows: Vec<&str> = content.lines().collect();
    tracing::debug!("Decoding {} rows from {:?}", rows.len(), path);
    println!("{}", decode(&rows, table));
    Ok(())
}

fn write_output(
    path: &Path,
    rows: &[String],
    format: Option<ExportFormat>,
    config: &Config,
) -> anyhow::Result<()> {
    let default_ext = format.map_or(config.output.default_extension.as_str(), |f| f.extension());
    let format = format.unwrap_or(config.output.format);
    let path = output_path(path, default_ext);

    if !format.keeps_color() && rows.iter().any(|row| has_ansi(row)) {
        tracing::warn!("Stripping color codes from output written to {:?}", path);
    }

    std::fs::write(&path, export(rows, format))
        .with_context(|| format!("Failed to write {:?}", path))?;
    tracing::info!("Wrote {} rows to {:?} as {}", rows.len(), path, format);
    Ok(())
}

/// `COLOR` or `COLOR:SUBSTRING`; only the first colon separates
fn parse_color_arg(arg: &str) -> StyleRule {
    match arg.split_once(':') {
        Some((color, substring)) => StyleRule::new(color, substring),
        None => StyleRule::whole_line(arg),
    }
}

/// Turn the two-character sequence `\n` into a newline
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
