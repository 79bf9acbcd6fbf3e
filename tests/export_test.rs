use symscan::export::{export_csv, export_json, export_to_path, export_xml};
use symscan::{Analysis, SymbolRecord, SymbolTable};

const SAMPLE: &str = r#"import os

class Employee:
    def __init__(self, name):
        self.name = name

def outer():
    from pkg import foo, bar

total = 0
"#;

fn sample_table() -> SymbolTable {
    Analysis::parse(SAMPLE, "test.py")
        .expect("failed to parse")
        .symbols()
        .clone()
}

/// The full 5-tuple projection used for round-trip comparisons; identity
/// is compared as an opaque value.
fn tuples(records: &[SymbolRecord]) -> Vec<(String, String, String, usize, u64)> {
    records
        .iter()
        .map(|r| {
            (
                r.name.clone(),
                r.kind.as_str().to_string(),
                r.scope.clone(),
                r.line,
                r.identity,
            )
        })
        .collect()
}

#[test]
fn test_csv_header_and_row_order() {
    let table = sample_table();
    let mut out = Vec::new();
    export_csv(&table, &mut out).expect("export failed");
    let text = String::from_utf8(out).unwrap();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Symbol,Type,Scope,Line,Address"));
    assert_eq!(lines.clone().count(), table.len());

    // First data row is the first record of the walk.
    let first = lines.next().unwrap();
    assert!(first.starts_with("os,Import,Global,1,"));
}

#[test]
fn test_csv_round_trip() {
    let table = sample_table();
    let mut out = Vec::new();
    export_csv(&table, &mut out).expect("export failed");

    let mut reader = csv::Reader::from_reader(out.as_slice());
    let mut restored = Vec::new();
    for result in reader.records() {
        let row = result.expect("csv read failed");
        restored.push((
            row[0].to_string(),
            row[1].to_string(),
            row[2].to_string(),
            row[3].parse::<usize>().unwrap(),
            row[4].parse::<u64>().unwrap(),
        ));
    }
    assert_eq!(restored, tuples(table.records()));
}

#[test]
fn test_csv_quotes_embedded_delimiters_only() {
    let table = sample_table();
    let mut out = Vec::new();
    export_csv(&table, &mut out).expect("export failed");
    let text = String::from_utf8(out).unwrap();

    // Nothing in a symbol table embeds a comma, so no field gets quoted.
    assert!(!text.contains('"'));
}

#[test]
fn test_json_round_trip_preserves_field_order() {
    let table = sample_table();
    let mut out = Vec::new();
    export_json(&table, &mut out).expect("export failed");
    let text = String::from_utf8(out).unwrap();

    // Field order per record is name, kind, scope, line, identity.
    let name_at = text.find("\"name\"").unwrap();
    let kind_at = text.find("\"kind\"").unwrap();
    let scope_at = text.find("\"scope\"").unwrap();
    let line_at = text.find("\"line\"").unwrap();
    let identity_at = text.find("\"identity\"").unwrap();
    assert!(name_at < kind_at && kind_at < scope_at);
    assert!(scope_at < line_at && line_at < identity_at);

    let restored: Vec<SymbolRecord> = serde_json::from_str(&text).expect("json read failed");
    assert_eq!(tuples(&restored), tuples(table.records()));
}

#[test]
fn test_xml_structure_and_round_trip() {
    let table = sample_table();
    let mut out = Vec::new();
    export_xml(&table, &mut out).expect("export failed");
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert_eq!(text.matches("  <symbol>\n").count(), table.len());
    assert_eq!(text.matches("  </symbol>\n").count(), table.len());

    // The record's first child element is <Name>, not the CSV column label.
    assert!(text.contains("  <symbol>\n    <Name>os</Name>"));
    assert!(!text.contains("<Symbol>"));

    let restored = read_xml_rows(&text);
    assert_eq!(restored, tuples(table.records()));
}

/// Minimal reader for the exporter's own XML shape: pulls the five child
/// element values out of each `<symbol>` block.
fn read_xml_rows(text: &str) -> Vec<(String, String, String, usize, u64)> {
    fn tag_value(block: &str, tag: &str) -> String {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let start = block.find(&open).unwrap() + open.len();
        let end = block.find(&close).unwrap();
        block[start..end]
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }

    // Split on the whole record-opening line so the root tag's own line
    // can never produce a stray block.
    text.split("  <symbol>\n")
        .skip(1)
        .map(|block| {
            (
                tag_value(block, "Name"),
                tag_value(block, "Type"),
                tag_value(block, "Scope"),
                tag_value(block, "Line").parse().unwrap(),
                tag_value(block, "Address").parse().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_empty_table_exports_are_valid_and_empty() {
    let table = Analysis::parse("", "test.py").unwrap().symbols().clone();

    let mut csv_out = Vec::new();
    export_csv(&table, &mut csv_out).expect("export failed");
    assert_eq!(
        String::from_utf8(csv_out).unwrap(),
        "Symbol,Type,Scope,Line,Address\n"
    );

    let mut json_out = Vec::new();
    export_json(&table, &mut json_out).expect("export failed");
    assert_eq!(String::from_utf8(json_out).unwrap(), "[]");

    let mut xml_out = Vec::new();
    export_xml(&table, &mut xml_out).expect("export failed");
    let xml = String::from_utf8(xml_out).unwrap();
    assert!(xml.contains("<symbols>"));
    assert!(xml.contains("</symbols>"));
    assert!(!xml.contains("  <symbol>\n"));
}

#[test]
fn test_exports_are_idempotent() {
    let table = sample_table();
    type Exporter = fn(&SymbolTable, &mut Vec<u8>) -> Result<(), symscan::Error>;
    // The exporters are generic over the writer, so wrap each in a
    // closure that pins the writer type before coercing to a fn pointer.
    let exporters: [Exporter; 3] = [
        |table, out| export_csv(table, out),
        |table, out| export_json(table, out),
        |table, out| export_xml(table, out),
    ];
    for export in exporters {
        let mut first = Vec::new();
        let mut second = Vec::new();
        export(&table, &mut first).expect("export failed");
        export(&table, &mut second).expect("export failed");
        assert_eq!(first, second);
    }
}

#[test]
fn test_export_to_path_picks_format_by_extension() {
    let table = sample_table();
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let csv_path = dir.path().join("symbols.csv");
    export_to_path(&table, &csv_path).expect("csv export failed");
    let csv_text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv_text.starts_with("Symbol,Type,Scope,Line,Address"));

    let json_path = dir.path().join("symbols.json");
    export_to_path(&table, &json_path).expect("json export failed");
    let restored: Vec<SymbolRecord> =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(restored.len(), table.len());

    let xml_path = dir.path().join("symbols.xml");
    export_to_path(&table, &xml_path).expect("xml export failed");
    let xml_text = std::fs::read_to_string(&xml_path).unwrap();
    assert!(xml_text.contains("<symbols>"));
}

#[test]
fn test_export_to_path_rejects_unknown_extension() {
    let table = sample_table();
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("symbols.yaml");

    let err = export_to_path(&table, &path).unwrap_err();
    assert!(matches!(err, symscan::Error::Format(_)));
    // The destination is not even created for an unknown format.
    assert!(!path.exists());
}

#[test]
fn test_export_failure_leaves_table_exportable() {
    let table = sample_table();
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let missing = dir.path().join("no_such_dir").join("symbols.csv");

    let err = export_to_path(&table, &missing).unwrap_err();
    assert!(matches!(err, symscan::Error::Io(_)));

    // The in-memory table is unaffected; a good destination works.
    let ok_path = dir.path().join("symbols.csv");
    export_to_path(&table, &ok_path).expect("retry export failed");
    assert!(ok_path.exists());
}
