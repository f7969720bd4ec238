//! Output export formats

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use html_escape::encode_text;
use serde::{Deserialize, Serialize};

use crate::ansi::{ansi_to_html, strip_ansi};

/// Line height of one row in SVG output, in pixels
const SVG_LINE_HEIGHT: usize = 16;
/// Advance of one monospace column in SVG output, in pixels
const SVG_CHAR_WIDTH: usize = 9;

/// Format rendered rows can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Text with color escapes kept
    #[default]
    Ansi,
    /// Plain text
    Txt,
    /// `<pre>` block with colored spans
    Html,
    /// `{"ascii": "..."}`
    Json,
    /// Monospace SVG text
    Svg,
}

impl ExportFormat {
    /// MIME type of the exported document
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Ansi | ExportFormat::Txt => "text/plain; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Svg => "image/svg+xml",
        }
    }

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ansi | ExportFormat::Txt => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
        }
    }

    /// Whether color escapes survive the export
    pub fn keeps_color(&self) -> bool {
        matches!(self, ExportFormat::Ansi | ExportFormat::Html)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" => Ok(ExportFormat::Ansi),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "html" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!(
                "unknown format '{}' (expected ansi, txt, html, json or svg)",
                other
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Ansi => "ansi",
            other => other.extension(),
        };
        f.write_str(name)
    }
}

/// Render `rows` as a document in `format`
pub fn export<S: AsRef<str>>(rows: &[S], format: ExportFormat) -> String {
    let text: String = rows
        .iter()
        .map(|row| format!("{}\n", row.as_ref()))
        .collect();

    match format {
        ExportFormat::Ansi => text,
        ExportFormat::Txt => strip_ansi(&text).into_owned(),
        ExportFormat::Html => format!("<pre>{}</pre>", ansi_to_html(&encode_text(&text))),
        ExportFormat::Json => {
            serde_json::json!({ "ascii": strip_ansi(&text) }).to_string()
        }
        ExportFormat::Svg => export_svg(rows),
    }
}

fn export_svg<S: AsRef<str>>(rows: &[S]) -> String {
    let lines: Vec<String> = rows.iter().map(|r| strip_ansi(r.as_ref()).into_owned()).collect();
    let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = columns * SVG_CHAR_WIDTH;
    let height = (lines.len() + 1) * SVG_LINE_HEIGHT;

    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">\n",
        width, height
    );
    out.push_str(
        "  <text x=\"0\" y=\"0\" font-family=\"monospace\" font-size=\"14\" xml:space=\"preserve\">\n",
    );
    for line in &lines {
        out.push_str(&format!(
            "    <tspan x=\"0\" dy=\"{}\">{}</tspan>\n",
            SVG_LINE_HEIGHT,
            encode_text(line)
        ));
    }
    out.push_str("  </text>\n</svg>\n");
    out
}

/// `path` with `default_ext` appended when it has no extension
pub fn output_path(path: impl AsRef<Path>, default_ext: &str) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some() || default_ext.is_empty() {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(default_ext.trim_start_matches('.'));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROWS: [&str; 2] = ["\x1b[31m<#>\x1b[0m", "& #"];

    #[test]
    fn test_export_ansi_and_txt() {
        assert_eq!(export(&ROWS, ExportFormat::Ansi), "\x1b[31m<#>\x1b[0m\n& #\n");
        assert_eq!(export(&ROWS, ExportFormat::Txt), "<#>\n& #\n");
        assert_eq!(export::<&str>(&[], ExportFormat::Txt), "");
    }

    #[test]
    fn test_export_html() {
        assert_eq!(
            export(&ROWS, ExportFormat::Html),
            "<pre><span style=\"color:#cd0000\">&lt;#&gt;</span>\n&amp; #\n</pre>"
        );
    }

    #[test]
    fn test_export_html_escapes_markup_only() {
        assert_eq!(
            export(&["<\"a\" & 'b'>"], ExportFormat::Html),
            "<pre>&lt;\"a\" &amp; 'b'&gt;\n</pre>"
        );
    }

    #[test]
    fn test_export_json() {
        let json = export(&ROWS, ExportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ascii"], "<#>\n& #\n");
    }

    #[test]
    fn test_export_svg() {
        let svg = export(&ROWS, ExportFormat::Svg);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"27\""));
        assert!(svg.contains("<tspan x=\"0\" dy=\"16\">&lt;#&gt;</tspan>"));
        assert!(svg.contains("&amp; #"));
        assert!(!svg.contains('\x1b'));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!("png".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
        assert_eq!(ExportFormat::Svg.to_string(), "svg");
        assert_eq!(ExportFormat::Ansi.to_string(), "ansi");
        assert!(!ExportFormat::Txt.keeps_color());
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("banner", "txt"), PathBuf::from("banner.txt"));
        assert_eq!(output_path("banner.out", "txt"), PathBuf::from("banner.out"));
        assert_eq!(output_path("dir/art", ".html"), PathBuf::from("dir/art.html"));
        assert_eq!(output_path("art", ""), PathBuf::from("art"));
    }
}
