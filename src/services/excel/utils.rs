use super::types::CellValue;

/// Parses a cell to a number, yielding `None` for blanks and anything that
/// is not a plain decimal. Text cells are trimmed first.
pub fn coerce_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Number(_) => None,
        CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        CellValue::Empty => None,
    }
}

/// Renders a cell as trimmed text. Whole numbers drop their fractional part
/// so a numeric customer code `1024.0` reads back as `1024`.
pub fn cell_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Text(s) => Some(s.trim().to_string()),
        CellValue::Number(f) => {
            if *f == f.floor() && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        CellValue::Empty => None,
    }
}

/// Formats with a fixed number of decimals and `,` thousands separators.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Builds a column reference string like `"AG"` from a zero-based column index.
pub fn col_letter(col_idx: usize) -> String {
    let mut n = col_idx + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

pub fn cell_ref(row_idx: usize, col_idx: usize) -> String {
    format!("{}{}", col_letter(col_idx), row_idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_number_accepts_numbers_and_numeric_text() {
        assert_eq!(coerce_number(&CellValue::Number(12.5)), Some(12.5));
        assert_eq!(coerce_number(&CellValue::Text(" 300 ".to_string())), Some(300.0));
        assert_eq!(coerce_number(&CellValue::Text("小計".to_string())), None);
        assert_eq!(coerce_number(&CellValue::Text("1,200".to_string())), None);
        assert_eq!(coerce_number(&CellValue::Empty), None);
        assert_eq!(coerce_number(&CellValue::Number(f64::NAN)), None);
    }

    #[test]
    fn cell_text_trims_and_prints_whole_numbers_without_fraction() {
        assert_eq!(cell_text(&CellValue::Text("  張三 ".to_string())).as_deref(), Some("張三"));
        assert_eq!(cell_text(&CellValue::Number(1024.0)).as_deref(), Some("1024"));
        assert_eq!(cell_text(&CellValue::Number(2.5)).as_deref(), Some("2.5"));
        assert_eq!(cell_text(&CellValue::Empty), None);
    }

    #[test]
    fn format_thousands_groups_integer_digits() {
        assert_eq!(format_thousands(0.0, 0), "0");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(150000.0, 1), "150,000.0");
        assert_eq!(format_thousands(-2500000.0, 0), "-2,500,000");
        assert_eq!(format_thousands(-512.25, 2), "-512.25");
    }

    #[test]
    fn col_letter_handles_multi_letter_columns() {
        assert_eq!(col_letter(0), "A");
        assert_eq!(col_letter(25), "Z");
        assert_eq!(col_letter(26), "AA");
        assert_eq!(col_letter(32), "AG");
        assert_eq!(cell_ref(9, 32), "AG10");
    }
}
