//! Partitioning of raw tokens into numeric and non-numeric groups.

/// Tokens split by whether they read as a number.
///
/// Every input token lands in exactly one of the two groups and each group keeps the input
/// order, so `numeric.len() + non_numeric.len()` always equals the input length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTokens {
    pub numeric: Vec<String>,
    pub non_numeric: Vec<String>,
}

/// Whether the whole token parses as a number.
///
/// Integer and floating-point forms with an optional sign are accepted (`"7"`, `"-3.5"`,
/// `"1e3"`, `"inf"`). Surrounding whitespace is not trimmed and a `NaN` literal does not
/// count as a number.
pub fn is_numeric(token: &str) -> bool {
    token.parse::<f64>().is_ok_and(|value| !value.is_nan())
}

/// Splits `tokens` into numeric and non-numeric groups, preserving relative order.
pub fn classify_tokens<I, S>(tokens: I) -> ClassifiedTokens
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let (numeric, non_numeric) = tokens.into_iter().map(Into::into).partition(|token: &String| is_numeric(token));

    ClassifiedTokens { numeric, non_numeric }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_tokens_are_partitioned_in_order() {
        let classified = classify_tokens(["a", "1", "B", "3.5"]);

        assert_eq!(classified.numeric, vec!["1", "3.5"]);
        assert_eq!(classified.non_numeric, vec!["a", "B"]);
    }

    #[test]
    fn test_empty_input() {
        let classified = classify_tokens(Vec::<String>::new());

        assert!(classified.numeric.is_empty());
        assert!(classified.non_numeric.is_empty());
    }

    #[test]
    fn test_numeric_forms() {
        for token in ["0", "42", "-7", "+7", "3.5", ".5", "5.", "1e3", "-2.5E-3", "inf", "-infinity"] {
            assert!(is_numeric(token), "{token:?} should be numeric");
        }
    }

    #[test]
    fn test_non_numeric_forms() {
        for token in ["", " ", " 1", "1 ", "abc", "1a", "0x1F", "1,000", "NaN", "nan", "--1", "_"] {
            assert!(!is_numeric(token), "{token:?} should not be numeric");
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let classified = classify_tokens(["1", "a", "1", "a"]);

        assert_eq!(classified.numeric, vec!["1", "1"]);
        assert_eq!(classified.non_numeric, vec!["a", "a"]);
    }
}
