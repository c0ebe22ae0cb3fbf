use serenity::all::UserId;

pub fn mention_user(user_id: UserId) -> String {
    format!("<@{}>", user_id)
}

/// Thousands separators: `1234567` -> `1,234,567`
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Elo as shown in lookups, whole points
pub fn format_elo(elo: f64) -> String {
    format_number(elo.round() as i64)
}

/// Cut to `max_chars` characters, ending in "..." when shortened
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let kept: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(-45_000), "-45,000");
    }

    #[test]
    fn test_format_elo_rounds() {
        assert_eq!(format_elo(1499.6), "1,500");
        assert_eq!(format_elo(987.2), "987");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("griefing in the wilderness", 12), "griefing ...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_mention_user() {
        assert_eq!(mention_user(UserId::new(42)), "<@42>");
    }
}
