//! Metadata output formatting.

use owo_colors::OwoColorize;
use segment_rules::request::Metadata;

use super::helpers::{column_heading, header};

/// Formats metadata as JSON.
pub fn format_metadata_json(meta: &Metadata) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(meta)
}

/// Formats metadata as a fields table, operator list and examples.
pub fn format_metadata_table(meta: &Metadata, use_colors: bool) -> String {
    let mut output = header("Allowed fields", use_colors);

    let field_width = meta
        .allowed_fields
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(0)
        .max("Field".len());
    output.push_str(&column_heading(
        &format!("{:<field_width$} {}", "Field", "Type"),
        use_colors,
    ));
    for name in &meta.allowed_fields {
        let value_type = meta.field_types.get(name).copied().unwrap_or("string");
        if use_colors {
            output.push_str(&format!(
                "{:<field_width$} {}\n",
                name,
                value_type.dimmed()
            ));
        } else {
            output.push_str(&format!("{:<field_width$} {}\n", name, value_type));
        }
    }

    output.push('\n');
    output.push_str(&header("Operators", use_colors));
    output.push_str(&meta.allowed_operators.join("  "));
    output.push_str("\n\n");

    output.push_str(&header("Examples", use_colors));
    for (label, text) in [
        ("basic", meta.examples.basic),
        ("complex", meta.examples.complex),
    ] {
        output.push_str(&format!("  {label}:\n"));
        for line in text.lines() {
            output.push_str(&format!("    {line}\n"));
        }
    }

    output
}
