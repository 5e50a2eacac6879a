//! The configured access code.

use std::fmt;

use crate::Error;

/// A validated 4-digit access code.
///
/// The code is read from configuration at startup, so validation failures
/// abort the server rather than surfacing to a client.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessPin(String);

impl AccessPin {
    /// Create an access code from a configuration string.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidPin] if `code` is not exactly four ASCII digits.
    pub fn new(code: &str) -> Result<Self, Error> {
        let code = code.trim();

        if code.len() == 4 && code.bytes().all(|byte| byte.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(Error::InvalidPin)
        }
    }

    /// Whether `attempt` matches the configured code.
    pub fn matches(&self, attempt: &str) -> bool {
        self.0 == attempt.trim()
    }
}

// The code must not end up in logs, so the Debug form is redacted.
impl fmt::Debug for AccessPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessPin(\"****\")")
    }
}

#[cfg(test)]
mod access_pin_tests {
    use crate::Error;

    use super::AccessPin;

    #[test]
    fn accepts_four_digits() {
        let pin = AccessPin::new("1923");

        assert!(pin.is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let pin = AccessPin::new(" 1923\n").unwrap();

        assert!(pin.matches("1923"));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(AccessPin::new("123"), Err(Error::InvalidPin));
        assert_eq!(AccessPin::new("12345"), Err(Error::InvalidPin));
        assert_eq!(AccessPin::new(""), Err(Error::InvalidPin));
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(AccessPin::new("12a4"), Err(Error::InvalidPin));
        assert_eq!(AccessPin::new("١٢٣٤"), Err(Error::InvalidPin));
    }

    #[test]
    fn matches_only_the_exact_code() {
        let pin = AccessPin::new("1923").unwrap();

        assert!(pin.matches("1923"));
        assert!(pin.matches(" 1923 "));
        assert!(!pin.matches("1924"));
        assert!(!pin.matches(""));
    }

    #[test]
    fn debug_format_is_redacted() {
        let pin = AccessPin::new("1923").unwrap();

        assert_eq!(format!("{pin:?}"), "AccessPin(\"****\")");
    }
}
