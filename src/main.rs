use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::domain::entities::criteria::{SortDirection, SortSpec};
use crate::domain::entities::record::{format_number, ReportRecord};
use crate::domain::entities::view_config::FieldKind;
use crate::infra::config::settings::{default_data_dir, AppSettings};

mod app;
mod domain;
mod infra;
mod platform;
mod ui;
mod usecase;


const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 8, 10, 25, 50];
const EMPTY_CELL: &str = "-";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let webview_data_dir = match default_webview_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            log::error!("{err:#}");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("ContractorHub Reports"))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(&default_data_dir()?)
}

/// Where the export folder picker starts.
fn default_export_dir(settings: &AppSettings) -> Result<PathBuf> {
    match settings.export_dir.as_ref() {
        Some(dir) => Ok(dir.clone()),
        None => Ok(default_data_dir()?.join("exports")),
    }
}

/// `total_transfers` -> `Total Transfers`.
fn metric_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_metric(name: &str, value: f64) -> String {
    if name.ends_with("_rate") {
        format!("{}%", format_number(value))
    } else {
        format_number(value)
    }
}

fn format_cell<R: ReportRecord>(record: &R, field: &str, kind: FieldKind) -> String {
    let formatted = match kind {
        FieldKind::Date => record
            .timestamp(field)
            .map(|timestamp| timestamp.format("%Y-%m-%d").to_string())
            .or_else(|| record.text(field)),
        FieldKind::Number => record
            .number(field)
            .map(format_number)
            .or_else(|| record.text(field)),
        FieldKind::Text | FieldKind::Category => record.text(field),
    };
    formatted
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Distinct trimmed values of `field`, for category chips.
fn distinct_values<R: ReportRecord>(records: &[R], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.text(field))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct values of `field` exactly as received. Status matching is exact,
/// so these are the dropdown values and only their labels are trimmed.
fn distinct_raw_values<R: ReportRecord>(records: &[R], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.text(field))
        .filter(|value| !value.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Value of an `<input type="date">`; empty or partial input clears the bound.
fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn format_date_input(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn sort_indicator(sort: Option<&SortSpec>, field: &str) -> &'static str {
    match sort {
        Some(spec) if spec.field == field => match spec.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    }
}

fn page_size_options(current: usize) -> Vec<usize> {
    let mut options = PAGE_SIZE_OPTIONS.to_vec();
    if !options.contains(&current) {
        options.push(current);
        options.sort_unstable();
    }
    options
}

fn column_alignment(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Number => "right",
        FieldKind::Text | FieldKind::Category | FieldKind::Date => "left",
    }
}

fn table_container_style() -> &'static str {
    "overflow: auto; max-height: 60vh; border: 1px solid #ddd; border-radius: 6px;"
}

fn table_header_cell_style(kind: FieldKind) -> String {
    format!(
        "position: sticky; top: 0; background: #f5f5f5; border-bottom: 1px solid #ccc; padding: 6px 8px; cursor: pointer; user-select: none; white-space: nowrap; text-align: {};",
        column_alignment(kind)
    )
}

fn table_body_cell_style(kind: FieldKind) -> String {
    format!(
        "border-bottom: 1px solid #eee; padding: 6px 8px; white-space: nowrap; text-align: {};",
        column_alignment(kind)
    )
}
