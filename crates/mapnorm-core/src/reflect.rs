//! Reflection adapter: turns Rust values into the normalizer's [`Value`] tree.
//!
//! Domain types implement [`Reflect`] by describing themselves as an
//! [`Object`](crate::Object), which is where each field's visibility is
//! declared:
//!
//! ```rust
//! use mapnorm_core::{Object, Reflect, Value};
//!
//! struct User {
//!     first_name: String,
//!     password_hash: String,
//! }
//!
//! impl Reflect for User {
//!     fn reflect(&self) -> Value {
//!         Object::builder("User")
//!             .public("firstName", self.first_name.as_str())
//!             .protected("passwordHash", self.password_hash.as_str())
//!             .build()
//!             .into()
//!     }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeZone};

use crate::types::{ObjectRef, Value};

/// Produce a [`Value`] description of `self`.
pub trait Reflect {
    fn reflect(&self) -> Value;
}

macro_rules! reflect_via_from {
    ($($t:ty),*) => {
        $(impl Reflect for $t {
            fn reflect(&self) -> Value {
                Value::from(*self)
            }
        })*
    };
}

reflect_via_from!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Reflect for str {
    fn reflect(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Reflect for String {
    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Reflect for Value {
    fn reflect(&self) -> Value {
        self.clone()
    }
}

impl Reflect for ObjectRef {
    fn reflect(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl Reflect for serde_json::Value {
    fn reflect(&self) -> Value {
        Value::from(self.clone())
    }
}

impl<Tz: TimeZone> Reflect for DateTime<Tz> {
    fn reflect(&self) -> Value {
        Value::DateTime(self.fixed_offset())
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Value {
        self.as_ref().map(Reflect::reflect).unwrap_or(Value::Null)
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Value {
        Value::List(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Value {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for BTreeMap<String, T> {
    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.reflect())).collect())
    }
}

/// Entries are enumerated in the map's iteration order.
impl<T: Reflect, S> Reflect for HashMap<String, T, S> {
    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.reflect())).collect())
    }
}
