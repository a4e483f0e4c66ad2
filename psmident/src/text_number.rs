use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// A number as written in a search engine output file. The original text is kept so it can be
/// written again without changing its formatting, the parsed value is available for computations.
/// ```rust
/// use psmident::TextNumber;
/// let score = TextNumber::new("1.20E-05");
/// assert_eq!(score.text(), "1.20E-05");
/// assert_eq!(score.value(), Some(1.2e-5));
/// assert_eq!(TextNumber::new("n/a").value(), None);
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TextNumber {
    text: String,
    value: Option<f64>,
}

impl TextNumber {
    /// Keep the given text and parse it as a number if possible
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = text.trim().parse::<f64>().ok();
        Self { text, value }
    }

    /// Create from a value, formatted with the given number of digits after the decimal point
    pub fn from_value(value: f64, digits: usize) -> Self {
        Self {
            text: format!("{value:.digits$}"),
            value: Some(value),
        }
    }

    /// The original text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed value, if the text is a number
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// If the text is a number
    pub const fn is_number(&self) -> bool {
        self.value.is_some()
    }
}

impl Display for TextNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for TextNumber {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TextNumber {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl FromStr for TextNumber {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
#[expect(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn keeps_text() {
        let number = TextNumber::new(" 0.0100 ");
        assert_eq!(number.to_string(), " 0.0100 ");
        assert_eq!(number.value(), Some(0.01));
        let formatted = TextNumber::from_value(2.0 / 3.0, 3);
        assert_eq!(formatted.text(), "0.667");
        assert!(formatted.is_number());
        assert!(!TextNumber::from("").is_number());
    }
}
