/// Reads the integer at the start of `s`, ignoring leading whitespace and anything after the digits.
///
/// `"3"`, `" 3"` and `"3abc"` all give `Some(3)`. Strings that do not start with a number give `None`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// `ceil(total_records / limit)`. Zero records means zero pages.
pub fn total_pages(total_records: i64, limit: i64) -> i64 {
    if limit <= 0 || total_records <= 0 {
        return 0;
    }
    (total_records - 1) / limit + 1
}
