//! CLI tool for progrid - runs rows through the grid pipeline and outputs JSON
//!
//! Usage:
//!   progrid_cli <rows.json>                          # All rows, as loaded
//!   progrid_cli <rows.json> --filter "alice active"  # Quick filter
//!   progrid_cli <rows.json> --sort age:desc,name:asc # Multi-column sort
//!   progrid_cli <rows.json> --page 2 -o out.json     # One page, to a file
//!
//! Columns come from `--columns cols.json`, or are inferred from the first row.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use progrid::{
    rows_from_json, ColumnDef, ColumnType, GridOptions, GridState, Row, SortDirection, SortItem,
};
use serde::Serialize;
use serde_json::Value;

const USAGE: &str = "Usage: progrid_cli <rows.json> [--columns cols.json] [--options opts.json] \
[--filter TEXT] [--sort field:asc,field2:desc] [--page N] [-o output.json]";

#[derive(Default)]
struct Args {
    rows_path: String,
    columns_path: Option<String>,
    options_path: Option<String>,
    filter: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
    output_path: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    total_rows: usize,
    filtered_rows: usize,
    page: Option<progrid::pagination::PaginationState>,
    rows: Vec<&'a Row>,
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .unwrap_or_else(|| fail(&format!("Missing value for {}\n{}", flag, USAGE)))
        };
        match arg.as_str() {
            "--columns" => parsed.columns_path = Some(value("--columns")),
            "--options" => parsed.options_path = Some(value("--options")),
            "--filter" => parsed.filter = Some(value("--filter")),
            "--sort" => parsed.sort = Some(value("--sort")),
            "--page" => {
                let page = value("--page");
                parsed.page = Some(
                    page.parse()
                        .unwrap_or_else(|_| fail(&format!("Invalid page number: {}", page))),
                );
            }
            "-o" => parsed.output_path = Some(value("-o")),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ if parsed.rows_path.is_empty() => parsed.rows_path = arg.clone(),
            _ => fail(&format!("Unexpected argument: {}\n{}", arg, USAGE)),
        }
    }
    if parsed.rows_path.is_empty() {
        fail(USAGE);
    }
    parsed
}

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Error reading {}: {}", path, e)))
}

/// One column per field of the first row, typed by its value.
fn infer_columns(rows: &[Row]) -> Vec<ColumnDef> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .iter()
        .map(|(field, value)| {
            let column_type = match value {
                Value::Number(_) => ColumnType::Number,
                Value::Bool(_) => ColumnType::Boolean,
                _ => ColumnType::Text,
            };
            ColumnDef::new(field.as_str())
                .with_type(column_type)
                .sortable()
        })
        .collect()
}

fn parse_sort(text: &str) -> Vec<SortItem> {
    text.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            let (field, direction) = part.split_once(':').unwrap_or((part, "asc"));
            let direction = SortDirection::parse(direction)
                .unwrap_or_else(|| fail(&format!("Invalid sort direction in {:?}", part)));
            SortItem::new(field.trim(), direction)
        })
        .collect()
}

fn main() {
    let args = parse_args();

    let rows = rows_from_json(&read(&args.rows_path))
        .unwrap_or_else(|e| fail(&format!("Error loading {}: {}", args.rows_path, e)));

    let columns: Vec<ColumnDef> = match &args.columns_path {
        Some(path) => serde_json::from_str(&read(path))
            .unwrap_or_else(|e| fail(&format!("Error loading {}: {}", path, e))),
        None => infer_columns(&rows),
    };

    let mut options = match &args.options_path {
        Some(path) => GridOptions::from_json(&read(path))
            .unwrap_or_else(|e| fail(&format!("Error loading {}: {}", path, e))),
        None => GridOptions::default(),
    };
    if args.page.is_some() {
        options.pagination = true;
    }

    let mut grid = GridState::new(options);
    grid.set_columns(&columns);
    grid.set_rows(rows);
    if let Some(text) = &args.filter {
        grid.set_quick_filter(text.as_str());
    }
    if let Some(sort) = &args.sort {
        grid.set_sort_model(parse_sort(sort));
    }
    if let Some(page) = args.page {
        grid.go_to_page(page);
    }

    let output = Output {
        total_rows: grid.total_rows(),
        filtered_rows: grid.filtered_count(),
        page: grid
            .options()
            .pagination
            .then(|| grid.pagination().state()),
        rows: grid.page_rows(),
    };

    let json = match serde_json::to_string_pretty(&output) {
        Ok(j) => j,
        Err(e) => fail(&format!("Error serializing JSON: {}", e)),
    };

    match &args.output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                fail(&format!("Error writing {}: {}", path, e));
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
