use regex::Regex;
use std::sync::LazyLock;

/// Turns upstream error text into a suggested wait, in seconds.
pub trait RetryHintExtractor: Send + Sync {
    fn retry_after(&self, message: &str) -> Option<f64>;
}

impl<F> RetryHintExtractor for F
where
    F: Fn(&str) -> Option<f64> + Send + Sync,
{
    fn retry_after(&self, message: &str) -> Option<f64> {
        self(message)
    }
}

static PLEASE_RETRY_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Please retry in\s+([0-9.]+)s").expect("static regex"));

/// Matches Gemini's quota message, e.g. `Please retry in 12.5s.`
#[derive(Debug, Clone, Copy, Default)]
pub struct PleaseRetryIn;

impl RetryHintExtractor for PleaseRetryIn {
    fn retry_after(&self, message: &str) -> Option<f64> {
        PLEASE_RETRY_IN
            .captures(message)?
            .get(1)?
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_decimal_seconds() {
        let msg = "429 Resource has been exhausted. Please retry in 12.5s.";
        assert_eq!(PleaseRetryIn.retry_after(msg), Some(12.5));
    }

    #[test]
    fn extracts_integer_seconds_with_extra_spaces() {
        assert_eq!(PleaseRetryIn.retry_after("Please retry in   60s"), Some(60.0));
    }

    #[test]
    fn pattern_is_case_sensitive() {
        assert_eq!(PleaseRetryIn.retry_after("please retry in 5s"), None);
    }

    #[test]
    fn unparsable_number_is_no_hint() {
        assert_eq!(PleaseRetryIn.retry_after("Please retry in 1.2.3s"), None);
        assert_eq!(PleaseRetryIn.retry_after("Please retry in soon"), None);
    }

    #[test]
    fn closures_are_extractors() {
        let fixed = |_: &str| Some(1.0);
        assert_eq!(fixed.retry_after("anything"), Some(1.0));
    }
}
