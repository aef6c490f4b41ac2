//! Output formatting utilities for the CLI
//!
//! Command results are rendered either as the exact command text or as a
//! JSON envelope. The ambient commands get tables with colors.

use anyhow::Result;
use bundle_core::codes::{ErrCode, ERR_OK};
use colored::*;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::HashMap;
use tabled::{settings::Style, Table, Tabled};

use crate::config::CliConfig;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Result of one subcommand: its result code and the text it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutput {
    pub code: ErrCode,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandOutput {
    pub fn new(code: ErrCode, output: impl Into<String>) -> Self {
        Self {
            code,
            output: output.into(),
            data: None,
        }
    }

    pub fn ok(output: impl Into<String>) -> Self {
        Self::new(ERR_OK, output)
    }

    /// Attach the structured value the text was rendered from.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }

    pub fn is_ok(&self) -> bool {
        self.code == ERR_OK
    }
}

/// Render a command result for printing.
///
/// Text output is returned verbatim; it already carries its line breaks.
pub fn render_output(output: &CommandOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(output.output.clone()),
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(output)?;
            rendered.push('\n');
            Ok(rendered)
        }
    }
}

/// Serialize `value` as JSON indented by four spaces.
pub fn to_json_dump<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Format the effective CLI configuration
pub fn format_config(config: &CliConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Text => {
            #[derive(Tabled)]
            struct SettingRow {
                #[tabled(rename = "Setting")]
                setting: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let rows = vec![
                SettingRow {
                    setting: "Server URL".to_string(),
                    value: config.server_url.cyan().to_string(),
                },
                SettingRow {
                    setting: "Output Format".to_string(),
                    value: config.output_format.clone(),
                },
                SettingRow {
                    setting: "Verbose".to_string(),
                    value: config.verbose.to_string(),
                },
                SettingRow {
                    setting: "Timeout".to_string(),
                    value: format!("{}s", config.timeout).yellow().to_string(),
                },
            ];

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "CLI Configuration:".bold(), table))
        }
    }
}

/// Format a health check report
pub fn format_health(
    health: &HashMap<String, serde_json::Value>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(health)?),
        OutputFormat::Text => {
            #[derive(Tabled)]
            struct HealthRow {
                #[tabled(rename = "Check")]
                check: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let mut keys: Vec<&String> = health.keys().collect();
            keys.sort();

            let rows: Vec<HealthRow> = keys
                .into_iter()
                .map(|key| {
                    let value = match &health[key] {
                        serde_json::Value::Bool(true) => "✓".green().to_string(),
                        serde_json::Value::Bool(false) => "✗".red().to_string(),
                        serde_json::Value::String(s) => s.clone(),
                        serde_json::Value::Number(n) => n.to_string(),
                        other => other.to_string(),
                    };
                    HealthRow {
                        check: key.clone(),
                        value,
                    }
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Service Health Check:".bold(), table))
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_core::codes::ERR_INVALID_VALUE;

    #[test]
    fn test_format_success() {
        let message = format_success("Configuration reset");
        assert!(message.contains("✓"));
        assert!(message.contains("Configuration reset"));
    }

    #[test]
    fn test_text_output_is_verbatim() {
        let output = CommandOutput::ok("set removable is ok \n");
        assert_eq!(render_output(&output, OutputFormat::Text).unwrap(), "set removable is ok \n");
    }

    #[test]
    fn test_json_output_envelope() {
        let output = CommandOutput::new(ERR_INVALID_VALUE, "error: failed to get rule \n")
            .with_data(&vec!["a", "b"]);
        let rendered = render_output(&output, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["code"], 22);
        assert_eq!(value["output"], "error: failed to get rule \n");
        assert_eq!(value["data"][1], "b");
    }

    #[test]
    fn test_json_dump_uses_four_spaces() {
        let dump = to_json_dump(&serde_json::json!({"bundleName": "com.example"})).unwrap();
        assert_eq!(dump, "{\n    \"bundleName\": \"com.example\"\n}");
    }

    #[test]
    fn test_format_config_json() {
        let config = CliConfig::default();
        let result = format_config(&config, OutputFormat::Json).unwrap();
        assert!(result.contains("server_url"));
        assert!(result.contains("8620"));
    }

    #[test]
    fn test_format_health_table() {
        let mut health = HashMap::new();
        health.insert("connected".to_string(), serde_json::Value::Bool(true));
        health.insert("bundle_count".to_string(), serde_json::json!(3));
        let result = format_health(&health, OutputFormat::Text).unwrap();
        assert!(result.contains("bundle_count"));
        assert!(result.contains("connected"));
    }
}
