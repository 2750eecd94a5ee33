use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

use crate::domain::entities::record::ReportRecord;
use crate::domain::entities::view_config::ExportColumn;

/// Renders `records` as CSV: one header row from the column headers, then
/// one row per record in the given order. Every cell is quoted.
pub fn export_csv<R: ReportRecord>(records: &[&R], columns: &[ExportColumn]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(columns.iter().map(|column| column.header.as_str()))
        .context("failed to write csv header")?;

    for record in records {
        let row = columns
            .iter()
            .map(|column| record.text(&column.field).unwrap_or_default())
            .collect::<Vec<_>>();
        writer
            .write_record(&row)
            .context("failed to write csv record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush csv output: {}", err.error()))?;
    String::from_utf8(bytes).context("csv output is not valid utf-8")
}

/// Header row plus data rows, each padded or truncated to the header width.
pub fn parse_csv(input: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::Reader::from_reader(input.as_bytes());
    let headers = reader
        .headers()
        .context("failed to read csv headers")?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let header_len = headers.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let row = (0..header_len)
            .map(|idx| record.get(idx).unwrap_or("").to_string())
            .collect();
        rows.push(row);
    }
    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::JsonRecord;
    use crate::domain::entities::view_config::ViewConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> JsonRecord {
        JsonRecord::from_value(value).expect("fixture should be an object")
    }

    fn columns(pairs: &[(&str, &str)]) -> Vec<ExportColumn> {
        pairs
            .iter()
            .map(|(header, field)| ExportColumn {
                header: header.to_string(),
                field: field.to_string(),
            })
            .collect()
    }

    #[test]
    fn every_cell_is_quoted_and_embedded_quotes_doubled() {
        let row = record(json!({"id": 1, "notes": "said \"hi\", left"}));
        let csv = export_csv(&[&row], &columns(&[("ID", "id"), ("Notes", "notes")]))
            .expect("export should succeed");
        assert_eq!(csv, "\"ID\",\"Notes\"\n\"1\",\"said \"\"hi\"\", left\"\n");
    }

    #[test]
    fn missing_fields_export_as_empty_cells() {
        let row = record(json!({"id": 1}));
        let csv = export_csv(&[&row], &columns(&[("ID", "id"), ("Notes", "notes")]))
            .expect("export should succeed");
        assert_eq!(csv.lines().nth(1), Some("\"1\",\"\""));
    }

    #[test]
    fn values_are_written_exactly_as_received() {
        let row = record(json!({
            "price": "1.10",
            "rate": 0.1234567,
            "total": "2.50",
            "code": "007",
        }));
        let csv = export_csv(
            &[&row],
            &columns(&[("Price", "price"), ("Rate", "rate"), ("Total", "total"), ("Code", "code")]),
        )
        .expect("export should succeed");
        assert_eq!(
            csv.lines().nth(1),
            Some("\"1.10\",\"0.1234567\",\"2.50\",\"007\"")
        );

        let (_, parsed) = parse_csv(&csv).expect("parse should succeed");
        assert_eq!(parsed, vec![vec!["1.10", "0.1234567", "2.50", "007"]]);
    }

    #[test]
    fn no_records_yields_header_only() {
        let config = ViewConfig::transactions();
        let csv = export_csv::<JsonRecord>(&[], &config.export_columns).expect("export should succeed");
        assert_eq!(
            csv,
            "\"Date\",\"Type\",\"Reference\",\"Quantity\",\"Notes\"\n"
        );
    }

    #[test]
    fn exported_text_parses_back_to_the_same_cells() {
        let rows = vec![
            record(json!({"a": "plain", "b": "comma, inside"})),
            record(json!({"a": "line\nbreak", "b": "\"quoted\""})),
        ];
        let refs = rows.iter().collect::<Vec<_>>();
        let csv = export_csv(&refs, &columns(&[("A", "a"), ("B", "b")])).expect("export should succeed");

        let (headers, parsed) = parse_csv(&csv).expect("parse should succeed");
        assert_eq!(headers, vec!["A", "B"]);
        assert_eq!(
            parsed,
            vec![
                vec!["plain".to_string(), "comma, inside".to_string()],
                vec!["line\nbreak".to_string(), "\"quoted\"".to_string()],
            ]
        );
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(parse_csv("").is_err());
    }
}
