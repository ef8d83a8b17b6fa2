//! Conversion of raw configuration strings into typed values.

/// A type that can be read from a configuration entry.
///
/// Values are whitespace-trimmed before conversion. Anything left over
/// after the value (e.g. `"12 m"` for an integer) is a type error.
pub trait FromItem: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Parse a trimmed raw value. `None` signals a type mismatch.
    fn from_item(raw: &str) -> Option<Self>;
}

impl FromItem for i64 {
    const TYPE_NAME: &'static str = "INT";

    fn from_item(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl FromItem for u64 {
    const TYPE_NAME: &'static str = "UNSIGNED INT";

    fn from_item(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl FromItem for usize {
    const TYPE_NAME: &'static str = "UNSIGNED INT";

    fn from_item(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl FromItem for f64 {
    const TYPE_NAME: &'static str = "DOUBLE";

    fn from_item(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl FromItem for bool {
    const TYPE_NAME: &'static str = "BOOL";

    fn from_item(raw: &str) -> Option<Self> {
        match raw {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl FromItem for String {
    const TYPE_NAME: &'static str = "STRING";

    /// A single token: empty values and embedded whitespace are rejected.
    fn from_item(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.contains(char::is_whitespace) {
            None
        } else {
            Some(raw.to_string())
        }
    }
}

impl<T: FromItem> FromItem for Vec<T> {
    const TYPE_NAME: &'static str = "LIST";

    /// Comma-separated elements, each converted with `T`'s rules.
    /// An empty string is an empty list.
    fn from_item(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(Vec::new());
        }
        raw.split(',').map(|part| T::from_item(part.trim())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn integers() {
        assert_eq!(i64::from_item("-12"), Some(-12));
        assert_eq!(i64::from_item("12 m"), None);
        assert_eq!(usize::from_item("64"), Some(64));
        assert_eq!(usize::from_item("-1"), None);
        assert_eq!(u64::from_item("1.5"), None);
    }

    #[test]
    fn doubles() {
        assert_eq!(f64::from_item("0.8"), Some(0.8));
        assert_eq!(f64::from_item("1.E-5"), Some(1e-5));
        assert_eq!(f64::from_item("fast"), None);
    }

    #[test]
    fn bools() {
        assert_eq!(bool::from_item("true"), Some(true));
        assert_eq!(bool::from_item("1"), Some(true));
        assert_eq!(bool::from_item("false"), Some(false));
        assert_eq!(bool::from_item("0"), Some(false));
        assert_eq!(bool::from_item("yes"), None);
    }

    #[test]
    fn strings_are_single_tokens() {
        assert_eq!(String::from_item("2"), Some("2".to_string()));
        assert_eq!(String::from_item("two words"), None);
        assert_eq!(String::from_item(""), None);
    }

    #[test]
    fn lists() {
        assert_eq!(
            Vec::<f64>::from_item("10, 30,50"),
            Some(vec![10.0, 30.0, 50.0])
        );
        assert_eq!(
            Vec::<String>::from_item("th,qt"),
            Some(vec!["th".to_string(), "qt".to_string()])
        );
        assert_eq!(Vec::<f64>::from_item(""), Some(Vec::new()));
        assert_eq!(Vec::<i64>::from_item("1,x,3"), None);
    }

    proptest! {
        #[test]
        fn doubles_read_back_exactly(v in proptest::num::f64::NORMAL) {
            prop_assert_eq!(f64::from_item(&v.to_string()), Some(v));
        }

        #[test]
        fn integer_lists_read_back(values in prop::collection::vec(any::<i64>(), 1..8)) {
            let raw = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            prop_assert_eq!(Vec::<i64>::from_item(&raw), Some(values));
        }
    }
}
