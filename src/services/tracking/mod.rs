pub mod progress;
pub mod service;

/// Storage key for a username: trimmed and lowercased, so lookups and
/// uniqueness are case-insensitive exact matches
pub fn username_key(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_key() {
        assert_eq!(username_key("Swab Pure"), "swab pure");
        assert_eq!(username_key("  SWAB pure "), "swab pure");
        assert_eq!(username_key("swab pure"), username_key("SWAB PURE"));
        assert_ne!(username_key("swab pure"), username_key("swabpure"));
    }
}
