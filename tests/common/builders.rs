//! Test builders — domain types that describe themselves through `Reflect`.
//!
//! These are designed for readability in test assertions, not for production
//! use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, FixedOffset, TimeZone};
use mapnorm::{Object, ObjectRef, Reflect, Value};

// ---------------------------------------------------------------------------
// Domain fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Address {
    pub street_name: String,
    pub city: String,
}

impl Reflect for Address {
    fn reflect(&self) -> Value {
        Object::builder("Address")
            .public("streetName", self.street_name.as_str())
            .public("city", self.city.as_str())
            .build()
            .into()
    }
}

/// A user record with one field of every visibility.
#[derive(Debug, Clone)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    /// Declared protected.
    pub password_hash: String,
    /// Declared private.
    pub api_token: String,
    pub home_address: Option<Address>,
    pub tags: Vec<String>,
    pub created_at: DateTime<FixedOffset>,
    pub deleted_at: Option<DateTime<FixedOffset>>,
}

impl Reflect for User {
    fn reflect(&self) -> Value {
        Object::builder("User")
            .public("firstName", self.first_name.as_str())
            .public("lastName", self.last_name.as_str())
            .public("email", self.email.reflect())
            .protected("passwordHash", self.password_hash.as_str())
            .private("apiToken", self.api_token.as_str())
            .public("homeAddress", self.home_address.reflect())
            .public("tags", self.tags.reflect())
            .public("createdAt", self.created_at)
            .public("deletedAt", self.deleted_at)
            .build()
            .into()
    }
}

// ---------------------------------------------------------------------------
// UserBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`User`] fixtures.
///
/// # Example
///
/// ```rust
/// let user = UserBuilder::new("Ada")
///     .email("ada@example.com")
///     .tag("math")
///     .build();
/// ```
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            user: User {
                first_name: first_name.into(),
                last_name: "Lovelace".to_string(),
                email: None,
                password_hash: "$argon2id$v=19$stub".to_string(),
                api_token: "tok_123".to_string(),
                home_address: None,
                tags: Vec::new(),
                created_at: ts("2024-01-15T10:30:00+02:00"),
                deleted_at: None,
            },
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.user.email = Some(email.into());
        self
    }

    pub fn address(mut self, street_name: &str, city: &str) -> Self {
        self.user.home_address = Some(Address {
            street_name: street_name.to_string(),
            city: city.to_string(),
        });
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.user.tags.push(tag.into());
        self
    }

    pub fn created_at(mut self, rfc3339: &str) -> Self {
        self.user.created_at = ts(rfc3339);
        self
    }

    pub fn deleted_at(mut self, rfc3339: &str) -> Self {
        self.user.deleted_at = Some(ts(rfc3339));
        self
    }

    pub fn build(self) -> User {
        self.user
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 timestamp, keeping its offset.
pub fn ts(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("fixture timestamp must be RFC 3339")
}

/// A fixed offset of `hours` east of UTC.
pub fn offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).expect("offset within ±24h")
}

/// The fully-populated user used by snapshot tests.
pub fn ada() -> User {
    UserBuilder::new("Ada")
        .email("ada@example.com")
        .address("12 Queen Street", "London")
        .tag("math")
        .tag("poetry")
        .build()
}

/// An object with one field of each visibility, all non-null.
pub fn visibility_probe() -> ObjectRef {
    Object::builder("Probe")
        .public("visible", 1)
        .protected("guarded", 2)
        .private("hidden", 3)
        .build()
}

/// A linked list of `len` nodes; `cyclic` points the tail back at the head.
pub fn chain(len: usize, cyclic: bool) -> ObjectRef {
    let head = Object::builder("Node").public("index", 0).public("next", Value::Null).build();
    let mut tail = head.clone();
    for i in 1..len {
        let node = Object::builder("Node")
            .public("index", i as i64)
            .public("next", Value::Null)
            .build();
        tail.set("next", node.clone());
        tail = node;
    }
    if cyclic {
        tail.set("next", head.clone());
    }
    head
}

/// Build a timestamp at a given wall-clock time in a zone `hours` east of UTC.
pub fn local(hours: i32, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    offset(hours)
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .expect("unambiguous fixture time")
}
