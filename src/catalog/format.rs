//! Human-readable rendering helpers

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Sentinel shown when a stream's size is unknown
pub const UNKNOWN_SIZE: &str = "Stream";

/// `52428800` -> `"50.0 MB"`; unknown or zero sizes render as a sentinel
pub fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) if b > 0 => format!("{:.1} MB", b as f64 / BYTES_PER_MB),
        _ => UNKNOWN_SIZE.to_string(),
    }
}

/// `1234567` -> `"1,234,567"`, missing -> `"N/A"`
pub fn format_views(count: Option<u64>) -> String {
    match count {
        Some(n) => group_thousands(n),
        None => "N/A".to_string(),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Numeric rank of a quality label ("1080p" -> 1080); sentinels rank 0
pub fn label_rank(label: &str) -> u64 {
    let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(Some(52_428_800)), "50.0 MB");
        assert_eq!(format_size(Some(1_572_864)), "1.5 MB");
        assert_eq!(format_size(Some(1)), "0.0 MB");
        assert_eq!(format_size(Some(0)), "Stream");
        assert_eq!(format_size(None), "Stream");
    }

    #[test]
    fn test_format_views() {
        assert_eq!(format_views(Some(0)), "0");
        assert_eq!(format_views(Some(999)), "999");
        assert_eq!(format_views(Some(1_000)), "1,000");
        assert_eq!(format_views(Some(1_234_567)), "1,234,567");
        assert_eq!(format_views(None), "N/A");
    }

    #[test]
    fn test_label_rank() {
        assert_eq!(label_rank("1080p"), 1080);
        assert_eq!(label_rank("128kbps"), 128);
        assert_eq!(label_rank("Auto"), 0);
        assert_eq!(label_rank(""), 0);
    }
}
