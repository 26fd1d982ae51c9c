//! Identifier case converters.
//!
//! [`safe_snake_case`] is the default key converter. It only inserts a
//! separator at case boundaries and maps existing delimiters one-to-one, so
//! already snake_case keys come back unchanged, acronyms are never
//! double-delimited, and the conversion is idempotent.

/// `true` when the uppercase letter at `i` starts a new word: after a
/// lowercase letter or digit, or as the last capital of an acronym that is
/// followed by a lowercase letter (`HTTPServer` → `HTTP`, `Server`).
fn starts_word(chars: &[char], i: usize) -> bool {
    if i == 0 || !chars[i].is_uppercase() {
        return false;
    }
    let prev = chars[i - 1];
    let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
    prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
}

fn is_delimiter(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Split an identifier into words, returning the run of leading underscores
/// separately so callers can keep it. Delimiters and other punctuation are
/// dropped.
pub fn split_words(s: &str) -> (&str, Vec<String>) {
    let body = s.trim_start_matches('_');
    let leading = &s[..s.len() - body.len()];

    let chars: Vec<char> = body.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if starts_word(&chars, i) && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    (leading, words)
}

/// `firstName` → `first_name`, `HTTPServer` → `http_server`,
/// `first_name` → `first_name`, `type_` → `type_`.
///
/// Leading underscores are kept as they are. Every other `_`, `-` or
/// whitespace character becomes one `separator`; any other punctuation is
/// kept (`@id` stays `@id`).
pub fn safe_snake_case(s: &str, separator: &str) -> String {
    let body = s.trim_start_matches('_');
    let mut result = String::with_capacity(s.len() + 4);
    result.push_str(&s[..s.len() - body.len()]);

    let chars: Vec<char> = body.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if is_delimiter(c) {
            result.push_str(separator);
            continue;
        }
        if starts_word(&chars, i) {
            result.push_str(separator);
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Naive conversion: a separator before every uppercase letter after the
/// first character, then lowercase. Whitespace is dropped.
///
/// Unlike [`safe_snake_case`], `HTTP` becomes `h_t_t_p` and `first_Name`
/// becomes `first__name`.
pub fn snake_case(s: &str, separator: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().filter(|c| !c.is_whitespace()).enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push_str(separator);
        }
        result.extend(c.to_lowercase());
    }
    result
}

pub fn camel_case(s: &str) -> String {
    let (leading, words) = split_words(s);
    let mut result = String::from(leading);
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            result.push_str(&word.to_lowercase());
        } else {
            result.push_str(&capitalize(word));
        }
    }
    result
}

pub fn pascal_case(s: &str) -> String {
    let (leading, words) = split_words(s);
    let mut result = String::from(leading);
    for word in &words {
        result.push_str(&capitalize(word));
    }
    result
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
