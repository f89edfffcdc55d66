//! Terminal output for analysis reports.

use anyhow::Result;
use javalint_core::{Report, Severity, Violation, ViolationDiagnostic};
use miette::GraphicalReportHandler;
use serde_json::{Map, Value};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

/// Renders a located violation with its source snippet.
fn render(handler: &GraphicalReportHandler, violation: &Violation) -> Option<String> {
    let diagnostic = ViolationDiagnostic::from_violation(violation)?;
    let mut out = String::new();
    handler.render_report(&mut out, &diagnostic).ok()?;
    Some(out)
}

fn print_text(report: &Report) {
    let (errors, warnings, infos) = report.count_by_severity();
    let handler = GraphicalReportHandler::new();

    for file in report.files() {
        if file.entries.is_empty() {
            continue;
        }
        println!("{} ({})", file.key, file.entries.len());
        for violation in file.entries {
            println!(
                "  {}: {} `{}`",
                severity_indicator(violation.severity),
                violation.kind,
                violation.name
            );
            if let Some(rendered) = render(&handler, violation) {
                println!("{rendered}");
            } else {
                println!("    {}", violation.message);
            }
        }
        println!();
    }

    for error in &report.file_errors {
        println!("  \x1b[33mskipped\x1b[0m: {error}");
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, report.files_checked
    );
}

/// Builds the combined JSON document: one key per report file.
fn to_json(report: &Report) -> Result<Value> {
    let mut map = Map::new();
    for file in report.files() {
        map.insert(file.key.to_owned(), serde_json::to_value(file.entries)?);
    }
    map.insert("filesChecked".to_owned(), Value::from(report.files_checked));
    map.insert(
        "fileErrors".to_owned(),
        serde_json::to_value(&report.file_errors)?,
    );
    Ok(Value::Object(map))
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(&to_json(report)?)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for violation in report.violations() {
        println!("{violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javalint_core::DeclKind;

    #[test]
    fn json_document_has_one_key_per_report_file() {
        let report = Report {
            classes: vec![Violation {
                kind: DeclKind::Class,
                name: "foo".into(),
                message: "PascalCase".into(),
                severity: Severity::Error,
                location: None,
            }],
            methods: Some(Vec::new()),
            files_checked: 3,
            ..Report::default()
        };
        let value = to_json(&report).unwrap();
        assert_eq!(value["nonMatchingClasses"][0]["className"], "foo");
        assert_eq!(value["nonMatchingVariables"], Value::Array(Vec::new()));
        assert_eq!(value["nonMatchingMethods"], Value::Array(Vec::new()));
        assert!(value.get("missingJavadocsClass").is_none());
        assert_eq!(value["filesChecked"], 3);
    }
}
