/// Insert `,` thousands separators into every run of ASCII digits.
///
/// Examples: "1234567" -> "1,234,567", "Ki 15000" -> "Ki 15,000".
/// Runs already short ("60.000.000") and words ("90 Septillion") are left
/// alone. Blank input yields "0".
pub fn format_ki(ki: &str) -> String {
    if ki.trim().is_empty() {
        return "0".to_string();
    }

    let mut out = String::with_capacity(ki.len() + ki.len() / 3);
    let mut run = String::new();
    for ch in ki.chars() {
        if ch.is_ascii_digit() {
            run.push(ch);
        } else {
            push_grouped(&mut out, &run);
            run.clear();
            out.push(ch);
        }
    }
    push_grouped(&mut out, &run);
    out
}

fn push_grouped(out: &mut String, digits: &str) {
    let n = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
}

/// Truncate to `max` chars, appending an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_from_the_right() {
        assert_eq!(format_ki("1"), "1");
        assert_eq!(format_ki("123"), "123");
        assert_eq!(format_ki("1234"), "1,234");
        assert_eq!(format_ki("1234567"), "1,234,567");
        assert_eq!(format_ki("100000"), "100,000");
    }

    #[test]
    fn leaves_non_digit_content_alone() {
        assert_eq!(format_ki("60.000.000"), "60.000.000");
        assert_eq!(format_ki("90 Septillion"), "90 Septillion");
        assert_eq!(format_ki("Ki 15000 aprox"), "Ki 15,000 aprox");
    }

    #[test]
    fn blank_is_zero() {
        assert_eq!(format_ki(""), "0");
        assert_eq!(format_ki("   "), "0");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("Goku", 10), "Goku");
        assert_eq!(truncate("Vegeta (Super Saiyan Blue)", 8), "Vegeta …");
    }
}
