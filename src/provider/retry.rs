use std::collections::HashMap;
use std::time::Duration;

const RETRY_AFTER: &str = "retry-after";

/// Wait hint a throttling upstream attached to its response, in whole seconds.
///
/// Twitter and OpenAI send the delay-seconds form; HTTP-date values yield `None`.
pub(crate) fn retry_after_from_headers(headers: &HashMap<String, String>) -> Option<Duration> {
    let seconds = headers.get(RETRY_AFTER).or_else(|| {
        headers
            .iter()
            .find_map(|(name, value)| name.eq_ignore_ascii_case(RETRY_AFTER).then_some(value))
    })?;
    seconds.trim().parse().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = HashMap::from([("Retry-After".to_string(), " 30 ".to_string())]);
        assert_eq!(
            retry_after_from_headers(&headers),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn missing_or_negative_hint_is_none() {
        assert_eq!(retry_after_from_headers(&HashMap::new()), None);
        let headers = HashMap::from([("retry-after".to_string(), "-5".to_string())]);
        assert_eq!(retry_after_from_headers(&headers), None);
    }

    #[test]
    fn http_date_values_are_ignored() {
        let headers = HashMap::from([(
            "retry-after".to_string(),
            "Wed, 21 Oct 2015 07:28:00 GMT".to_string(),
        )]);
        assert_eq!(retry_after_from_headers(&headers), None);
    }
}
