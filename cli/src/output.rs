//! Output formatting for form outlines and resolution reports.

use command_form_core::Value;
use command_form_widgets::{FormValues, WidgetError, WidgetSummary};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Resolution outcome of one parameter.
#[derive(Debug, Serialize)]
pub struct Entry<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a WidgetError>,
}

/// Everything `resolve` reports.
#[derive(Debug, Serialize)]
pub struct ResolutionReport<'a> {
    pub command: &'a str,
    pub aborted: bool,
    pub params: Vec<Entry<'a>>,
}

impl<'a> ResolutionReport<'a> {
    pub fn new(command: &'a str, values: &'a FormValues) -> Self {
        let params = values
            .iter()
            .map(|(name, result)| match result {
                Ok(value) => Entry {
                    name,
                    value: value.as_ref(),
                    error: None,
                },
                Err(err) => Entry {
                    name,
                    value: None,
                    error: Some(err),
                },
            })
            .collect();
        Self {
            command,
            aborted: values.is_aborted(),
            params,
        }
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        _ => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
    }
}

/// Formats the control trees of a form.
pub fn format_form(
    command: &str,
    widgets: &[WidgetSummary],
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(form_to_table(command, widgets)),
        _ => serialize(&widgets, format),
    }
}

/// Formats a resolution report.
pub fn format_report(report: &ResolutionReport<'_>, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(report_to_table(report)),
        _ => serialize(report, format),
    }
}

fn form_to_table(command: &str, widgets: &[WidgetSummary]) -> String {
    let mut rows = Vec::new();
    for widget in widgets {
        collect_rows(widget, 0, &mut rows);
    }
    let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(4);

    let mut out = format!("Command: {command}\n");
    if rows.is_empty() {
        out.push_str("  (no parameters)\n");
    }
    for (name, detail) in rows {
        out.push_str(&format!("  {name:<width$}  {detail}\n"));
    }
    out
}

fn collect_rows(widget: &WidgetSummary, depth: usize, rows: &mut Vec<(String, String)>) {
    let name = format!("{}{}", "  ".repeat(depth), widget.name);
    let mut detail = format!("{:?} <{}>", widget.kind, widget.value_type);
    if widget.shape.nargs != 1 {
        detail.push_str(&format!(" nargs={}", widget.shape.nargs));
    }
    if widget.shape.multiple {
        detail.push_str(" multiple");
    }
    rows.push((name, detail));
    for child in &widget.children {
        collect_rows(child, depth + 1, rows);
    }
}

fn report_to_table(report: &ResolutionReport<'_>) -> String {
    let width = report
        .params
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(4);

    let mut out = format!("Command: {}", report.command);
    if report.aborted {
        out.push_str("  (aborted)");
    }
    out.push('\n');
    for entry in &report.params {
        let shown = match (entry.value, entry.error) {
            (_, Some(err)) => format!("error: {err}"),
            (Some(value), None) => value.to_string(),
            (None, None) => "-".to_string(),
        };
        out.push_str(&format!("  {:<width$}  {shown}\n", entry.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use command_form_core::{CommandDescriptor, Context, MapEnv, ParamDescriptor, ParamType};
    use command_form_widgets::Form;

    use super::*;

    fn form() -> Form {
        let cmd = CommandDescriptor::new("copy")
            .with_param(ParamDescriptor::argument("src", ParamType::String))
            .with_param(ParamDescriptor::option("size", ParamType::int()).with_nargs(2));
        Form::new(&cmd, &Context::new("copy").with_env(MapEnv::new()))
    }

    #[test]
    fn test_form_table_indents_children() {
        let form = form();
        let table = form_to_table("copy", &form.summaries());
        assert!(table.starts_with("Command: copy\n"));
        assert!(table.contains("RepeatedGroup <integer> nargs=2"), "{table}");
        assert!(table.contains("\n    size"), "{table}");
    }

    #[test]
    fn test_report_lists_values_and_errors() {
        let mut form = form();
        let ctx = Context::new("copy").with_env(MapEnv::new());
        let values = form.resolve(&ctx);
        let report = ResolutionReport::new("copy", &values);

        let table = report_to_table(&report);
        assert!(table.contains("error: missing argument 'src'"), "{table}");
        assert!(table.contains("[0, 0]"), "{table}");

        let json: serde_json::Value =
            serde_json::from_str(&format_report(&report, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["params"][0]["error"]["kind"], "required");
        assert_eq!(json["params"][1]["value"], serde_json::json!([0, 0]));
        assert_eq!(json["aborted"], false);
    }
}
