// Scalar values
// Cells are stored as plain text. This module is the one place where that text
// becomes a typed value for comparison and aggregation.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A typed value used while filtering and counting
///
/// Serializes untagged, so JSON output carries `null`, numbers and strings
/// rather than variant names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Returned by `Scalar::to_number` when a value has no numeric reading
#[derive(Debug, Clone, PartialEq, Error)]
#[error("value {0} is not numeric")]
pub struct NotNumeric(pub String);

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_))
    }

    /// Interpret the value as a number regardless of its variant
    ///
    /// Text is accepted when its trimmed form parses as a float, which also
    /// covers integers with stray whitespace and exponent notation.
    pub fn to_number(&self) -> Result<f64, NotNumeric> {
        match self {
            Scalar::Integer(i) => Ok(*i as f64),
            Scalar::Float(f) => Ok(*f),
            Scalar::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| NotNumeric(self.literal())),
            Scalar::Null => Err(NotNumeric(self.literal())),
        }
    }

    /// Render the value the way it would be written in a query
    pub fn literal(&self) -> String {
        match self {
            Scalar::Null => "NULL".to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => format!("{:?}", f),
            Scalar::Text(s) => format!("'{}'", s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Classify a raw cell into a `Scalar`
///
/// Absent and blank cells are Null. Text containing a decimal point is tried
/// as a float, anything else as an integer. Text that fails its numeric
/// parse is kept as trimmed text.
pub fn classify(raw: Option<&str>) -> Scalar {
    let text = match raw.map(str::trim) {
        None | Some("") => return Scalar::Null,
        Some(text) => text,
    };

    parse_number(text).unwrap_or_else(|| Scalar::Text(text.to_string()))
}

/// Numeric half of the classification shared by cells and query literals
/// Whole numbers too large for `i64` are still numbers and become floats
pub(crate) fn parse_number(text: &str) -> Option<Scalar> {
    if text.contains('.') {
        return text.parse::<f64>().ok().map(Scalar::Float);
    }

    match text.parse::<i64>() {
        Ok(i) => Some(Scalar::Integer(i)),
        Err(_) if is_whole_number(text) => text.parse::<f64>().ok().map(Scalar::Float),
        Err(_) => None,
    }
}

/// Digits with an optional leading sign
fn is_whole_number(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_blank_is_null() {
        assert_eq!(classify(None), Scalar::Null);
        assert_eq!(classify(Some("")), Scalar::Null);
        assert_eq!(classify(Some("   \t")), Scalar::Null);
    }

    #[test]
    fn test_classify_numbers() {
        assert_eq!(classify(Some("42")), Scalar::Integer(42));
        assert_eq!(classify(Some(" -7 ")), Scalar::Integer(-7));
        assert_eq!(classify(Some("3.5")), Scalar::Float(3.5));
        assert_eq!(classify(Some(".5")), Scalar::Float(0.5));
    }

    #[test]
    fn test_classify_falls_back_to_trimmed_text() {
        assert_eq!(classify(Some(" Alice ")), Scalar::Text("Alice".to_string()));
        assert_eq!(classify(Some("1.2.3")), Scalar::Text("1.2.3".to_string()));
        // Exponent form without a decimal point is not an integer
        assert_eq!(classify(Some("1e3")), Scalar::Text("1e3".to_string()));
    }

    #[test]
    fn test_classify_oversized_integer() {
        assert_eq!(
            classify(Some("99999999999999999999")),
            Scalar::Float(99999999999999999999.0)
        );
        assert_eq!(classify(Some("-9223372036854775808")), Scalar::Integer(i64::MIN));
        assert_eq!(classify(Some("12a")), Scalar::Text("12a".to_string()));
        assert_eq!(classify(Some("-")), Scalar::Text("-".to_string()));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Scalar::Integer(3).to_number(), Ok(3.0));
        assert_eq!(Scalar::Text("1e3".to_string()).to_number(), Ok(1000.0));
        assert!(Scalar::Text("abc".to_string()).to_number().is_err());
        assert!(Scalar::Null.to_number().is_err());
    }

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Scalar::Text("abc".to_string()).literal(), "'abc'");
        assert_eq!(Scalar::Float(30.0).literal(), "30.0");
        assert_eq!(Scalar::Null.literal(), "NULL");
    }

    #[test]
    fn test_serializes_untagged() {
        let values = vec![
            Scalar::Null,
            Scalar::Integer(1),
            Scalar::Float(2.5),
            Scalar::Text("x".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,1,2.5,"x"]"#);
    }
}
