//! Static JSON documents used across harnesses.

/// Keys already in snake_case; default options must leave them untouched.
pub const DOC_PLAIN_SNAKE: &str = r#"{"id":7,"user_name":"ada","is_admin":false,"score":9.5,"nickname":"countess"}"#;

/// A flat document with camelCase and acronym keys.
pub const DOC_CAMEL: &str = r#"{"firstName":"Ada","lastName":"Lovelace","userID":42,"HTTPStatus":200}"#;

/// Nested mapping with a null deep inside.
pub const DOC_NESTED: &str = r#"{"user":{"firstName":"Al","meta":null}}"#;

/// A row carrying the SQL audit columns.
pub const DOC_AUDITED_ROW: &str = r#"{
    "id": 1,
    "title": "Invoice",
    "secret": "s3cr3t",
    "createdAt": "2024-01-15 08:30:00",
    "createdBy": "system",
    "updatedAt": "2024-01-16 09:00:00",
    "updatedBy": "ada",
    "deletedAt": null,
    "deletedBy": null
}"#;

/// All documents that are already normalised under default options.
pub const CORPUS_PLAIN: &[&str] = &[
    DOC_PLAIN_SNAKE,
    r#"{"a":1}"#,
    r#"{"nested":{"inner_key":"v","deeper":{"x":true}}}"#,
    r#"{}"#,
];

/// Parse a fixture document into an input value.
pub fn doc(json: &str) -> mapnorm::Value {
    let parsed: serde_json::Value = serde_json::from_str(json).expect("fixture must be valid JSON");
    mapnorm::Value::from(parsed)
}
