//! Table, JSON and YAML output

use chrono::{DateTime, Utc};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

use crate::encoding::{self, DocumentFormat};
use crate::error::{CredentialError, Result};

/// Output formats accepted by `--output`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(CredentialError::ValidationError(format!(
                "invalid format: {}",
                other
            ))),
        }
    }
}

/// Write a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    print_document(out, DocumentFormat::Json, value)
}

/// Write a value as YAML
pub fn print_yaml<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    print_document(out, DocumentFormat::Yaml, value)
}

fn print_document<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    format: DocumentFormat,
    value: &T,
) -> Result<()> {
    let data = encoding::marshal(format, &value).map_err(|e| CredentialError::SerializeError {
        context: "unable to render output".to_string(),
        message: e.to_string(),
    })?;
    out.write_all(&data)?;
    if !data.ends_with(b"\n") {
        writeln!(out)?;
    }
    Ok(())
}

/// Write rows as a table, projecting each item with `row`
///
/// Headers are printed even when there are no rows.
pub fn print_table<T, F>(out: &mut dyn Write, items: &[T], headers: &[&str], row: F) -> Result<()>
where
    F: Fn(&T) -> Vec<String>,
{
    let mut table = base_table();
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for item in items {
        table.add_row(row(item));
    }

    writeln!(out, "{}", table)?;
    Ok(())
}

/// Borderless table with a rule under the header
pub(crate) fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Formats timestamps relative to a fixed "now"
///
/// Every row of one render shares the same reference point.
#[derive(Debug, Clone, Copy)]
pub struct TimePrinter {
    now: DateTime<Utc>,
}

impl TimePrinter {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Format a timestamp as relative time (e.g., "2 hours ago")
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        if *datetime == DateTime::<Utc>::default() {
            return "-".to_string();
        }

        let duration = self.now.signed_duration_since(*datetime);

        if duration.num_seconds() < 0 {
            datetime.format("%Y-%m-%d").to_string()
        } else if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            let mins = duration.num_minutes();
            format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
        } else if duration.num_hours() < 24 {
            let hours = duration.num_hours();
            format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
        } else if duration.num_days() < 30 {
            let days = duration.num_days();
            format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
        } else {
            datetime.format("%Y-%m-%d").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);

        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, CredentialError::ValidationError(_)));
        assert_eq!(err.to_string(), "invalid format: xml");
    }

    #[test]
    fn test_empty_table_keeps_headers() {
        let mut out = Vec::new();
        let rows: Vec<(String, String)> = Vec::new();
        print_table(&mut out, &rows, &["NAMESPACE", "NAME"], |r| {
            vec![r.0.clone(), r.1.clone()]
        })
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("NAMESPACE"));
        assert!(text.contains("NAME"));
    }

    #[test]
    fn test_json_output_ends_with_newline() {
        let mut out = Vec::new();
        print_json(&mut out, &vec!["a", "b"]).unwrap();
        assert!(out.ends_with(b"\n"));
        let parsed: Vec<String> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, vec!["a", "b"]);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let tp = TimePrinter::new(now);

        assert_eq!(tp.format(&now), "just now");
        assert_eq!(tp.format(&(now - Duration::minutes(1))), "1 minute ago");
        assert_eq!(tp.format(&(now - Duration::hours(3))), "3 hours ago");
        assert_eq!(tp.format(&(now - Duration::days(2))), "2 days ago");
        assert_eq!(tp.format(&(now - Duration::days(90))), "2024-03-03");
        assert_eq!(tp.format(&DateTime::<Utc>::default()), "-");
    }
}
