use crate::error::Error;
use crate::symbols::SymbolTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row of the tabular export.
const CSV_HEADER: [&str; 5] = ["Symbol", "Type", "Scope", "Line", "Address"];

/// Child element names per record in the markup export.
const XML_TAGS: [&str; 5] = ["Name", "Type", "Scope", "Line", "Address"];

/// Writes the table as delimited text: a header row, then one row per
/// record in table order. Fields are quoted only when they embed a
/// delimiter, which the `csv` writer handles.
pub fn export_csv<W: Write>(table: &SymbolTable, writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for record in table {
        csv_writer.write_record([
            record.name.clone(),
            record.kind.as_str().to_string(),
            record.scope.clone(),
            record.line.to_string(),
            record.identity.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the table as a JSON array of records. Field order per record is
/// name, kind, scope, line, identity; an empty table serializes as `[]`.
pub fn export_json<W: Write>(table: &SymbolTable, writer: W) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, table)?;
    Ok(())
}

/// Writes the table as an element tree: a `<symbols>` root with one
/// `<symbol>` child per record, each holding the five named text elements.
pub fn export_xml<W: Write>(table: &SymbolTable, mut writer: W) -> Result<(), Error> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(writer, "<symbols>")?;
    for record in table {
        let fields = [
            escape_xml(&record.name),
            record.kind.as_str().to_string(),
            escape_xml(&record.scope),
            record.line.to_string(),
            record.identity.to_string(),
        ];
        writeln!(writer, "  <symbol>")?;
        for (tag, value) in XML_TAGS.iter().zip(&fields) {
            writeln!(writer, "    <{tag}>{value}</{tag}>")?;
        }
        writeln!(writer, "  </symbol>")?;
    }
    writeln!(writer, "</symbols>")?;
    Ok(())
}

/// Exports the table to a file, picking the format from the destination's
/// extension (`csv`, `json`, or `xml`).
///
/// On failure the destination's contents are unspecified; the in-memory
/// table is untouched and can be exported again once the destination is
/// fixed.
pub fn export_to_path(table: &SymbolTable, path: &Path) -> Result<(), Error> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !matches!(extension.as_str(), "csv" | "json" | "xml") {
        return Err(Error::Format(extension));
    }
    let mut writer = BufWriter::new(File::create(path)?);
    match extension.as_str() {
        "csv" => export_csv(table, &mut writer)?,
        "json" => export_json(table, &mut writer)?,
        _ => export_xml(table, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Escapes the five XML-reserved characters in element text.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
