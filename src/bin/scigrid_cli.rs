//! CLI tool for scigrid - runs a CSV/TSV file through the grid's view
//! pipeline and writes the displayed rows back out as CSV.
//!
//! Usage:
//!   scigrid_cli <input.csv>                          # CSV to stdout
//!   scigrid_cli <input.tsv> -o out.csv               # CSV to file
//!   scigrid_cli <input.csv> --sort 2:desc --sort 0   # multi-column sort
//!   scigrid_cli <input.csv> --filter 1:gt:10         # column filter
//!   scigrid_cli <input.csv> --filter 1:between:1:5   # range filter
//!   scigrid_cli <input.csv> --quick needle           # quick filter
//!
//! Columns are given by index or header name.

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Write};

use scigrid::data::{parse_delimited, Delimiter};
use scigrid::filter::{ColumnFilter, FilterOperator, SortState};
use scigrid::units::parse_scientific_value;
use scigrid::{CellValue, DataGridProvider, GridConfig, GridCore, SortOrder, VecProvider};

const USAGE: &str = "Usage: scigrid_cli <input.csv|input.tsv> [-o output.csv] \
                     [--sort COL[:asc|desc]]... [--filter COL:OP[:VALUE[:VALUE]]]... [--quick TEXT]";

#[derive(Debug, Default)]
struct Args {
    input: String,
    output: Option<String>,
    sorts: Vec<String>,
    filters: Vec<String>,
    quick: Option<String>,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut raw = raw.into_iter();
    while let Some(arg) = raw.next() {
        let mut value = |name: &str| raw.next().ok_or_else(|| format!("{name} needs a value"));
        match arg.as_str() {
            "-o" | "--output" => args.output = Some(value("-o")?),
            "--sort" => args.sorts.push(value("--sort")?),
            "--filter" => args.filters.push(value("--filter")?),
            "--quick" => args.quick = Some(value("--quick")?),
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with('-') => return Err(format!("unknown option {other}")),
            other if args.input.is_empty() => args.input = other.to_string(),
            other => return Err(format!("unexpected argument {other}")),
        }
    }
    if args.input.is_empty() {
        return Err(USAGE.to_string());
    }
    Ok(args)
}

/// Resolve a column by index or case-insensitive header name.
fn resolve_column(provider: &VecProvider, spec: &str) -> Result<u32, String> {
    if let Ok(index) = spec.parse::<u32>() {
        if (index as usize) < provider.column_count() {
            return Ok(index);
        }
        return Err(format!("column {index} out of range"));
    }
    provider
        .headers()
        .iter()
        .position(|h| h.name.eq_ignore_ascii_case(spec))
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| format!("no column named {spec}"))
}

fn parse_sort(provider: &VecProvider, spec: &str) -> Result<SortState, String> {
    let (col, order) = match spec.rsplit_once(':') {
        Some((col, "desc")) => (col, SortOrder::Desc),
        Some((col, "asc")) => (col, SortOrder::Asc),
        _ => (spec, SortOrder::Asc),
    };
    Ok(SortState {
        col: resolve_column(provider, col)?,
        order,
    })
}

/// Numbers (including unit-prefixed ones) compare numerically, anything
/// else as text.
fn filter_value(text: &str) -> CellValue {
    let number = parse_scientific_value(text);
    if number.is_nan() {
        CellValue::Text(text.to_string())
    } else {
        CellValue::Number(number)
    }
}

fn parse_filter(provider: &VecProvider, spec: &str) -> Result<ColumnFilter, String> {
    let mut parts = spec.splitn(4, ':');
    let col = parts.next().unwrap_or_default();
    let op = parts
        .next()
        .ok_or_else(|| format!("filter {spec} has no operator"))?;
    let operator: FilterOperator = serde_json::from_value(serde_json::Value::String(op.into()))
        .map_err(|_| format!("unknown filter operator {op}"))?;
    let col = resolve_column(provider, col)?;
    let value = parts.next().map_or(CellValue::Empty, filter_value);
    let mut filter = ColumnFilter::new(col, operator, value);
    if let Some(high) = parts.next() {
        filter.value_to = filter_value(high);
    }
    Ok(filter)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(env::args().skip(1))?;

    let text = fs::read_to_string(&args.input)
        .map_err(|e| format!("Error reading {}: {e}", args.input))?;
    let provider = parse_delimited(&text, Delimiter::from_path(&args.input));

    let sorts = args
        .sorts
        .iter()
        .map(|s| parse_sort(&provider, s))
        .collect::<Result<Vec<_>, _>>()?;
    let filters = args
        .filters
        .iter()
        .map(|f| parse_filter(&provider, f))
        .collect::<Result<Vec<_>, _>>()?;

    let mut grid = GridCore::new(Box::new(provider), GridConfig::default());
    grid.set_filters(filters);
    grid.set_sorts(sorts);
    if let Some(quick) = &args.quick {
        grid.set_quick_filter(quick);
    }
    let csv = grid.export_csv();

    match &args.output {
        Some(path) => {
            fs::write(path, &csv).map_err(|e| format!("Error writing {path}: {e}"))?;
            eprintln!("Wrote {} rows to {path}", grid.row_count());
        }
        None => {
            io::stdout().write_all(csv.as_bytes())?;
        }
    }
    Ok(())
}
