use std::str::FromStr;
use std::time::Duration;

use crate::loader::error::ConfigLoadError;

/// Read `name` through `lookup`, treating blank values as unset.
pub fn non_empty_var<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse `name` as `T`; unparsable values are treated as unset.
pub fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    non_empty_var(lookup, name).and_then(|raw| raw.parse().ok())
}

/// Parse a human-readable duration such as `5s` or `1500ms`.
pub fn parse_duration(
    field: &'static str,
    raw: &str,
) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            field,
            value: raw.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn blank_values_are_unset() {
        let env = lookup(&[("A", "  "), ("B", " x ")]);
        assert_eq!(non_empty_var(&env, "A"), None);
        assert_eq!(non_empty_var(&env, "B").as_deref(), Some("x"));
        assert_eq!(non_empty_var(&env, "C"), None);
    }

    #[test]
    fn unparsable_numbers_are_unset() {
        let env = lookup(&[("PORT", "eighty"), ("OTHER", "8080")]);
        assert_eq!(parse_var::<u16, _>(&env, "PORT"), None);
        assert_eq!(parse_var::<u16, _>(&env, "OTHER"), Some(8080));
    }

    #[test]
    fn durations_accept_humantime_forms() {
        assert_eq!(
            parse_duration("retry.backoff", "5s").unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(
            parse_duration("retry.backoff", "1500ms").unwrap(),
            Duration::from_millis(1500)
        );
        let err = parse_duration("retry.backoff", "soon").unwrap_err();
        assert!(err.to_string().contains("retry.backoff"));
    }
}
