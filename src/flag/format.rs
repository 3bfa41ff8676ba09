//! Text layout for flag documents written back to the repository.
//!
//! Files in the flag repository are tab indented, end with a newline and use
//! LF line endings. The document is pretty printed with four-space indents and
//! each leading four-space run is then turned into a tab.

use serde::Serialize;
use serde_json::{Serializer, Value, ser::PrettyFormatter};

use crate::errors::FlagError;

const INDENT: &str = "    ";

pub fn format_document(doc: &Value) -> Result<String, FlagError> {
    let mut buf = Vec::new();
    let mut ser =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT.as_bytes()));
    doc.serialize(&mut ser)?;
    let pretty = String::from_utf8(buf)?;

    let mut out = pretty
        .lines()
        .map(tabify)
        .collect::<Vec<_>>()
        .join("\n");

    if !out.ends_with('\n') {
        out.push('\n');
    }

    Ok(out.replace("\r\n", "\n"))
}

/// Replaces each leading run of four spaces with a tab. Spaces after the
/// indentation, including inside strings, are kept as is.
fn tabify(line: &str) -> String {
    let body = line.trim_start_matches(' ');
    let leading = line.len() - body.len();
    let mut out = String::with_capacity(line.len());
    for _ in 0..leading / INDENT.len() {
        out.push('\t');
    }
    for _ in 0..leading % INDENT.len() {
        out.push(' ');
    }
    out.push_str(body);
    out
}
