//! Compile and validate output formatting.

use owo_colors::OwoColorize;
use segment_rules::request::{Evaluation, Validation};
use segment_rules::Condition;

use super::helpers::{column_heading, header, truncate_str};

/// Widest value shown in the conditions table.
const MAX_VALUE_WIDTH: usize = 40;

/// Formats an evaluation as JSON.
pub fn format_evaluation_json(evaluation: &Evaluation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(evaluation)
}

/// Formats an evaluation as a conditions table followed by the expression.
pub fn format_evaluation_table(
    evaluation: &Evaluation,
    use_colors: bool,
) -> Result<String, serde_json::Error> {
    let compiled = &evaluation.compiled;
    let mut output = String::new();

    output.push_str(&header("Conditions", use_colors));
    output.push_str(&format_conditions(&compiled.conditions, use_colors));
    output.push('\n');

    output.push_str(&header("Filter expression", use_colors));
    output.push_str(&serde_json::to_string_pretty(&compiled.filter_expression)?);
    output.push_str("\n\n");

    let pagination = format!(
        "Page {}, limit {}",
        evaluation.pagination.page, evaluation.pagination.limit
    );
    if use_colors {
        output.push_str(&format!("{}\n", pagination.dimmed()));
    } else {
        output.push_str(&pagination);
        output.push('\n');
    }

    Ok(output)
}

/// Formats a validation result as JSON.
pub fn format_validation_json(validation: &Validation) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(validation)
}

/// Formats a validation result as a status line and conditions table.
pub fn format_validation_table(validation: &Validation, use_colors: bool) -> String {
    let conditions = &validation.compiled.conditions;
    let noun = if conditions.len() == 1 {
        "condition"
    } else {
        "conditions"
    };
    let status = format!("Rules are valid ({} {})", conditions.len(), noun);

    let mut output = if use_colors {
        format!("{} {}\n\n", "✓".green(), status)
    } else {
        format!("✓ {status}\n\n")
    };
    output.push_str(&format_conditions(conditions, use_colors));
    output
}

/// Formats conditions as a numbered table.
fn format_conditions(conditions: &[Condition], use_colors: bool) -> String {
    let field_width = conditions
        .iter()
        .map(|c| c.field().chars().count())
        .max()
        .unwrap_or(0)
        .max("Field".len());

    let mut output = column_heading(
        &format!("{:<3} {:<field_width$} {:<3} {}", "#", "Field", "Op", "Value"),
        use_colors,
    );

    for (index, condition) in conditions.iter().enumerate() {
        let number = format!("{:<3}", index + 1);
        let operator = format!("{:<3}", condition.operator().symbol());
        let value = truncate_str(condition.value(), MAX_VALUE_WIDTH);

        let line = if use_colors {
            format!(
                "{} {:<field_width$} {} {}",
                number.dimmed(),
                condition.field(),
                operator.cyan(),
                value
            )
        } else {
            format!(
                "{} {:<field_width$} {} {}",
                number,
                condition.field(),
                operator,
                value
            )
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment_rules::request::{evaluate, validate_rules, SegmentRequest};

    #[test]
    fn test_evaluation_table_without_colors() {
        let request =
            SegmentRequest::new("price >= 100\nstock_status = instock").with_pagination(2, 10);
        let evaluation = evaluate(&request).unwrap();
        let table = format_evaluation_table(&evaluation, false).unwrap();

        assert!(table.starts_with("Conditions\n"));
        assert!(table.contains("#   Field        Op  Value\n"));
        assert!(table.contains("1   price        >=  100\n"));
        assert!(table.contains("2   stock_status =   instock\n"));
        assert!(table.contains("Filter expression\n{\n"));
        assert!(table.contains(r#""stock_status": "instock""#));
        assert!(table.ends_with("Page 2, limit 10\n"));
    }

    #[test]
    fn test_evaluation_json() {
        let evaluation = evaluate(&SegmentRequest::new("on_sale = true")).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_evaluation_json(&evaluation).unwrap()).unwrap();
        assert_eq!(json["filterExpression"]["on_sale"], true);
        assert_eq!(json["pagination"]["limit"], 50);
    }

    #[test]
    fn test_validation_table() {
        let validation = validate_rules("stock_quantity > 5").unwrap();
        let table = format_validation_table(&validation, false);
        assert!(table.starts_with("✓ Rules are valid (1 condition)\n"));
        assert!(table.contains("stock_quantity >   5"));
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "x".repeat(60);
        let validation = validate_rules(&format!("title = {long}")).unwrap();
        let table = format_validation_table(&validation, false);
        assert!(table.contains(&format!("{}...", "x".repeat(37))));
        assert!(!table.contains(&long));
    }
}
