use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for lot display names: must start with a letter or digit and
    /// may contain spaces and common punctuation.
    /// - Valid: "Central Garage", "Lot 5 - North", "St. Mary's Parking"
    /// - Invalid: " Central", "-west", "" (empty)
    pub static ref LOT_NAME_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 .,'&/-]*$").unwrap();

    /// Regex for generated spot labels: one or more uppercase letters
    /// followed by a 1-2 digit slot number.
    /// - Valid: "A1", "B10", "AA3"
    /// - Invalid: "a1", "A0", "A100", "1A"
    pub static ref SPOT_LABEL_REGEX: Regex = Regex::new(r"^[A-Z]+([1-9]|10)$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lot_name_regex_valid() {
        assert!(LOT_NAME_REGEX.is_match("Central Garage"));
        assert!(LOT_NAME_REGEX.is_match("Lot 5 - North"));
        assert!(LOT_NAME_REGEX.is_match("St. Mary's Parking"));
        assert!(LOT_NAME_REGEX.is_match("7th & Main"));
    }

    #[test]
    fn test_lot_name_regex_invalid() {
        assert!(!LOT_NAME_REGEX.is_match(" Central")); // leading space
        assert!(!LOT_NAME_REGEX.is_match("-west")); // leading punctuation
        assert!(!LOT_NAME_REGEX.is_match("")); // empty
        assert!(!LOT_NAME_REGEX.is_match("Lot\t5")); // control character
    }

    #[test]
    fn test_spot_label_regex() {
        assert!(SPOT_LABEL_REGEX.is_match("A1"));
        assert!(SPOT_LABEL_REGEX.is_match("B10"));
        assert!(SPOT_LABEL_REGEX.is_match("AA3"));
        assert!(!SPOT_LABEL_REGEX.is_match("a1"));
        assert!(!SPOT_LABEL_REGEX.is_match("A0"));
        assert!(!SPOT_LABEL_REGEX.is_match("A11"));
        assert!(!SPOT_LABEL_REGEX.is_match("1A"));
    }
}
