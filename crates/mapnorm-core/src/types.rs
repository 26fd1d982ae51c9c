//! Core types for mapnorm-core.
//!
//! This module defines the input side of the normalizer: the dynamic [`Value`]
//! tree, shared [`Object`] records whose [`Field`]s carry an explicit
//! [`Visibility`] tag, and the [`ObjectBuilder`] used by adapters to describe
//! domain types.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, FixedOffset, TimeZone};

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Access level a record field was declared with.
///
/// Only [`Visibility::Protected`] is ever filtered by the normalizer; private
/// fields are emitted regardless of configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    /// Private to `declared_in`. Two private fields with the same name may
    /// coexist on one record when they are declared by different types.
    Private { declared_in: String },
}

impl Visibility {
    pub fn is_protected(&self) -> bool {
        matches!(self, Visibility::Protected)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private { declared_in } => write!(f, "private({declared_in})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A dynamically-typed input value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    /// A zoned instant. Normalised to UTC on output.
    DateTime(DateTime<FixedOffset>),
    List(Vec<Value>),
    /// Ordered entries. Duplicate keys are kept and enumerated in order.
    Map(Vec<(String, Value)>),
    Object(ObjectRef),
}

impl Value {
    /// Build a [`Value::Map`] from ordered `(key, value)` pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! value_from_int {
    ($variant:ident => $($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        })*
    };
}

value_from_int!(Int => i8, i16, i32, i64, u8, u16, u32);
value_from_int!(UInt => u64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::DateTime(v.fixed_offset())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One named field of an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Clean field name, without any visibility decoration.
    pub name: String,
    pub visibility: Visibility,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, visibility: Visibility, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            visibility,
            value: value.into(),
        }
    }
}

/// A record with a type name and an ordered field list.
///
/// Fields sit behind a lock so they can be reassigned after the object has
/// been shared, which is how self-referencing graphs are built.
pub struct Object {
    type_name: String,
    fields: RwLock<Vec<Field>>,
}

impl Object {
    pub fn builder(type_name: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Read access to the fields, in declaration order (inherited fields
    /// included wherever the adapter placed them).
    pub fn fields(&self) -> RwLockReadGuard<'_, Vec<Field>> {
        self.fields.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the value of the first field called `name`. Appends a public
    /// field when none exists.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        match fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => fields.push(Field::new(name, Visibility::Public, value)),
        }
    }
}

/// Shared handle to an [`Object`]. Equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Arc<Object>);

impl ObjectRef {
    /// Identity of the underlying allocation, stable for the object's lifetime.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl std::ops::Deref for ObjectRef {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.0
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Field values are not printed: the graph may be cyclic.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.fields().iter().map(|fd| fd.name.clone()).collect();
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name)
            .field("id", &format_args!("{:#x}", self.id()))
            .field("fields", &names)
            .finish()
    }
}

/// Fluent constructor for [`Object`] records.
///
/// ```rust
/// use mapnorm_core::{Object, Value};
///
/// let user = Object::builder("User")
///     .public("firstName", "Ada")
///     .protected("passwordHash", "x")
///     .private("secret", 42)
///     .build();
/// assert_eq!(user.fields().len(), 3);
/// let _ = Value::from(user);
/// ```
#[derive(Debug)]
pub struct ObjectBuilder {
    type_name: String,
    fields: Vec<Field>,
}

impl ObjectBuilder {
    pub fn public(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field(Field::new(name, Visibility::Public, value))
    }

    pub fn protected(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field(Field::new(name, Visibility::Protected, value))
    }

    /// A private field declared by the type being built.
    pub fn private(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let declared_in = self.type_name.clone();
        self.private_of(declared_in, name, value)
    }

    /// A private field declared by an ancestor type.
    pub fn private_of(
        self,
        declared_in: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        let visibility = Visibility::Private {
            declared_in: declared_in.into(),
        };
        self.field(Field::new(name, visibility, value))
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> ObjectRef {
        ObjectRef(Arc::new(Object {
            type_name: self.type_name,
            fields: RwLock::new(self.fields),
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
