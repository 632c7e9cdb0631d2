use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating generus phone numbers
    /// Digits only with an optional leading plus, 8-15 digits
    /// - Valid: "081234567890", "+6281234567890"
    /// - Invalid: "0812-3456-7890", "12345", "phone"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{8,15}$").unwrap();

    /// Regex for audit log entity type filters
    /// Lowercase words joined by underscores
    /// - Valid: "generus", "presence", "audit_log"
    /// - Invalid: "Generus", "_desa", "desa_", "desa kelompok"
    pub static ref ENTITY_TYPE_REGEX: Regex = Regex::new(r"^[a-z]+(?:_[a-z]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("081234567890"));
        assert!(PHONE_REGEX.is_match("+6281234567890"));
        assert!(PHONE_REGEX.is_match("02741234"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("0812-3456-7890")); // separators
        assert!(!PHONE_REGEX.is_match("1234567")); // too short
        assert!(!PHONE_REGEX.is_match("1234567890123456")); // too long
        assert!(!PHONE_REGEX.is_match("phone"));
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_entity_type_regex() {
        assert!(ENTITY_TYPE_REGEX.is_match("generus"));
        assert!(ENTITY_TYPE_REGEX.is_match("audit_log"));
        assert!(!ENTITY_TYPE_REGEX.is_match("Generus"));
        assert!(!ENTITY_TYPE_REGEX.is_match("_desa"));
        assert!(!ENTITY_TYPE_REGEX.is_match("desa_"));
        assert!(!ENTITY_TYPE_REGEX.is_match("desa kelompok"));
    }
}
