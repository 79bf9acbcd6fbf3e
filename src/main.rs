use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use symscan::{Analysis, MetricSet, SymbolTable};

/// Command line interface configuration using `clap`.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Python file to analyze.
    path: PathBuf,

    /// Print code metrics after the symbol table.
    #[arg(long)]
    metrics: bool,

    /// Print details for the named symbol.
    #[arg(long, value_name = "NAME")]
    describe: Option<String>,

    /// Export the symbol table to this file; the format is chosen by the
    /// extension (.csv, .json, or .xml).
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Output raw JSON instead of the human-readable report.
    #[arg(long)]
    json: bool,
}

/// Machine-readable report emitted by `--json`.
#[derive(Serialize)]
struct Report<'a> {
    symbols: &'a SymbolTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;

    // Parse and build the table. A syntax error surfaces here with the
    // parser's message and location; nothing else is attempted after it.
    let analysis = Analysis::parse(source, &cli.path.to_string_lossy())
        .with_context(|| format!("failed to analyze {}", cli.path.display()))?;

    if let Some(destination) = &cli.export {
        analysis
            .export(destination)
            .with_context(|| format!("failed to export to {}", destination.display()))?;
    }

    if cli.json {
        let report = Report {
            symbols: analysis.symbols(),
            metrics: cli.metrics.then(|| analysis.metrics()),
            details: cli.describe.as_deref().and_then(|name| analysis.describe(name)),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_symbol_table(analysis.symbols());

    if cli.metrics {
        println!("\n{}", "Code Metrics".bold());
        println!("============");
        for (label, value) in analysis.metrics().entries() {
            println!("{label}: {value}");
        }
    }

    if let Some(name) = &cli.describe {
        println!("\n{}", name.bold());
        println!("{}", "=".repeat(name.len()));
        match analysis.describe(name) {
            Some(details) => println!("{details}"),
            None => println!("Details not found."),
        }
    }

    if let Some(destination) = &cli.export {
        println!(
            "\nExported {} symbols to {}",
            analysis.symbols().len(),
            destination.display()
        );
    }

    Ok(())
}

/// Prints the five-column symbol table in row order.
fn print_symbol_table(table: &SymbolTable) {
    println!("{}", "Symbol Table".bold());
    println!("============\n");

    if table.is_empty() {
        println!("(no symbols)");
        return;
    }

    // Column widths sized to the longest entry, headers included.
    let mut widths = [6usize, 4, 5, 4];
    for record in table {
        widths[0] = widths[0].max(record.name.len());
        widths[1] = widths[1].max(record.kind.as_str().len());
        widths[2] = widths[2].max(record.scope.len());
        widths[3] = widths[3].max(record.line.to_string().len());
    }

    // Pad before styling so the escape codes don't skew the widths.
    let header = format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}  {}",
        "Symbol",
        "Type",
        "Scope",
        "Line",
        "Address",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    );
    println!("{}", header.bold());
    for record in table {
        println!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}  {}",
            record.name,
            record.kind.as_str(),
            record.scope,
            record.line,
            record.identity,
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
    }
}
