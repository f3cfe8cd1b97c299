//! Output formatting: table or JSON.
//!
//! Table uses `tabled`; JSON serializes the original data via serde.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

/// Resolved output settings handed to every command handler.
#[derive(Debug, Clone, Copy)]
pub struct OutputOpts {
    pub format: OutputFormat,
    pub quiet: bool,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items, building table rows with `to_row`.
pub fn render_list<T, R>(format: OutputFormat, data: &[T], to_row: impl Fn(&T) -> R) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data),
    }
}

/// Render a single item; tables use the pre-formatted `detail_fn` output.
pub fn render_single<T>(format: OutputFormat, data: &T, detail_fn: impl Fn(&T) -> String) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Short status line on stderr, suppressed by `--quiet`.
pub fn status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

/// Compact display of a JSON value for table cells.
pub fn cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "-".into(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Tabled, serde::Serialize)]
    struct Row {
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    #[test]
    fn table_and_json_render_the_same_rows() {
        let rows = [Row { name: "Garage" }];
        let table = render_list(OutputFormat::Table, &rows, |r| Row { name: r.name });
        assert!(table.contains("Name"));
        assert!(table.contains("Garage"));

        let json = render_list(OutputFormat::Json, &rows, |r| Row { name: r.name });
        assert!(json.contains("\"name\": \"Garage\""));
    }

    #[test]
    fn cells_strip_string_quotes() {
        assert_eq!(cell(&json!("Armed")), "Armed");
        assert_eq!(cell(&json!(21.5)), "21.5");
        assert_eq!(cell(&json!(null)), "-");
    }
}
