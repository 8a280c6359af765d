use super::model::DemoTable;

/// Dropdown entry: row position plus its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOption {
    pub index: usize,
    pub label: String,
}

/// Render a value as whole dollars with thousands separators,
/// e.g. `250000.0` → `"$250,000"`. Negative values keep the sign after the
/// dollar symbol (`"$-1,234"`).
pub fn format_currency(value: f64) -> String {
    let rounded = format!("{value:.0}");
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    // "-0" after rounding is just zero.
    let sign = if digits.bytes().all(|b| b == b'0') { "" } else { sign };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${sign}{grouped}")
}

/// `"$250,000"` for a present value, `"N/A"` otherwise.
pub fn format_optional_currency(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), format_currency)
}

pub fn label_for_row(index: usize, actual: Option<f64>) -> String {
    format!("Row {index} | Actual: {}", format_optional_currency(actual))
}

/// Build one option per table row. `actual_col` is the position of the
/// actual-price column, if the table has one.
pub fn build_options(table: &DemoTable, actual_col: Option<usize>) -> Vec<DemoOption> {
    table
        .rows()
        .enumerate()
        .map(|(index, row)| {
            let actual = actual_col.and_then(|c| row[c].as_f64());
            DemoOption {
                index,
                label: label_for_row(index, actual),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(250000.0), "$250,000");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(100_000.0), "$100,000");
    }

    #[test]
    fn currency_drops_decimals() {
        assert_eq!(format_currency(1234.4), "$1,234");
        assert_eq!(format_currency(1234.6), "$1,235");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn currency_ties_round_to_even() {
        assert_eq!(format_currency(1234.5), "$1,234");
        assert_eq!(format_currency(1235.5), "$1,236");
        assert_eq!(format_currency(2.5), "$2");
    }

    #[test]
    fn currency_keeps_negative_sign() {
        assert_eq!(format_currency(-1234.0), "$-1,234");
    }

    #[test]
    fn labels_use_na_for_missing_actuals() {
        assert_eq!(label_for_row(0, Some(250000.0)), "Row 0 | Actual: $250,000");
        assert_eq!(label_for_row(7, None), "Row 7 | Actual: N/A");
    }

    #[test]
    fn options_cover_every_row() {
        let table = DemoTable::new(
            vec!["SquareFeet".into(), "ActualPrice".into()],
            vec![
                vec![CellValue::Number(1000.0), CellValue::Number(150000.0)],
                vec![CellValue::Number(1200.0), CellValue::Missing],
                vec![CellValue::Number(1400.0), CellValue::Text("unknown".into())],
            ],
        )
        .unwrap();

        let options = build_options(&table, Some(1));
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Row 0 | Actual: $150,000",
                "Row 1 | Actual: N/A",
                "Row 2 | Actual: N/A",
            ]
        );

        let without_column = build_options(&table, None);
        assert!(without_column.iter().all(|o| o.label.ends_with("N/A")));
    }
}
