//! Assertion macros for normalised output.
//!
//! These wrap `pretty_assertions` and print the available keys on failure, so
//! it is clear which stage of the pipeline dropped or renamed a field.

/// Assert that an output mapping has `key` with an expected JSON value.
///
/// The expected value is any `json!` body:
///
/// ```rust
/// assert_has_key!(out, "first_name", "Ada");
/// assert_has_key!(out, "address", { "city": "London" });
/// ```
#[macro_export]
macro_rules! assert_has_key {
    ($out:expr, $key:expr, $($value:tt)+) => {{
        let out: &mapnorm::Output = &$out;
        let key: &str = $key;
        let expected = serde_json::json!($($value)+);
        match out.get(key) {
            Some(actual) => pretty_assertions::assert_eq!(
                *actual, expected,
                "assert_has_key! failed for {:?}", key
            ),
            None => panic!(
                "assert_has_key! failed: key {:?} not found.\n  Available keys: {:?}",
                key,
                out.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

/// Assert that an output mapping does not contain `key`.
#[macro_export]
macro_rules! assert_missing_key {
    ($out:expr, $key:expr) => {{
        let out: &mapnorm::Output = &$out;
        let key: &str = $key;
        if let Some(value) = out.get(key) {
            panic!(
                "assert_missing_key! failed: {:?} is present with value {}",
                key, value
            );
        }
    }};
}

/// Assert the exact key sequence of an output mapping.
///
/// ```rust
/// assert_keys!(out, ["id", "name"]);
/// ```
#[macro_export]
macro_rules! assert_keys {
    ($out:expr, [$($key:expr),* $(,)?]) => {{
        let out: &mapnorm::Output = &$out;
        let actual: Vec<&str> = out.keys().map(String::as_str).collect();
        let expected: Vec<&str> = vec![$($key),*];
        pretty_assertions::assert_eq!(actual, expected, "output key order");
    }};
}
