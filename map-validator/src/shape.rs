//! Property descriptor tables
//!
//! A [`Shape`] is a type with a fixed, ordered set of named public properties.
//! The table is normally generated by `#[derive(Shape)]`, but it can be written
//! by hand for types the derive cannot see (foreign types, computed views):
//!
//! ```rust
//! use map_validator::{Property, Shape, Unset};
//!
//! pub struct Invoice {
//!     pub number: String,
//!     pub total: u64,
//! }
//!
//! impl Shape for Invoice {
//!     fn properties() -> Vec<Property<Self>> {
//!         vec![
//!             Property::readable("number", "number", |i: &Self| i.number.is_unset()),
//!             Property::readable("total", "total", |i: &Self| i.total.is_unset()),
//!         ]
//!     }
//! }
//! ```

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::TypeNameStyle;

/// A type whose public properties can be enumerated and inspected.
pub trait Shape: Sized + 'static {
    /// Name used in error messages and logs
    fn shape_name() -> &'static str {
        short_type_name(type_name::<Self>())
    }

    /// Public instance properties in declaration order.
    fn properties() -> Vec<Property<Self>>;

    /// Names of every property, readable or not.
    fn property_names() -> Vec<&'static str> {
        Self::properties().iter().map(Property::name).collect()
    }

    /// Resolve a property by its name, or by the Rust field it was declared on.
    ///
    /// Property names win over field names; a raw identifier (`r#type`) matches `type`.
    fn find_property(selector: &str) -> Option<Property<Self>> {
        let selector = selector.strip_prefix("r#").unwrap_or(selector);
        let properties = Self::properties();

        properties
            .iter()
            .find(|p| p.name() == selector)
            .or_else(|| properties.iter().find(|p| p.field() == selector))
            .copied()
    }
}

/// How a property's value can be reached.
pub enum Access<T> {
    /// Readable; the function reports whether the current value is the type default
    Readable(fn(&T) -> bool),
    WriteOnly,
}

impl<T> Clone for Access<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Access<T> {}

/// One entry of a shape's descriptor table.
pub struct Property<T> {
    name: &'static str,
    field: &'static str,
    access: Access<T>,
}

impl<T> Property<T> {
    pub const fn readable(name: &'static str, field: &'static str, is_unset: fn(&T) -> bool) -> Self {
        Self {
            name,
            field,
            access: Access::Readable(is_unset),
        }
    }

    pub const fn write_only(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            access: Access::WriteOnly,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn access(&self) -> Access<T> {
        self.access
    }

    pub fn is_readable(&self) -> bool {
        matches!(self.access, Access::Readable(_))
    }

    /// Whether the property still holds its default on `instance`.
    ///
    /// Write-only properties cannot be read and are never reported as unset.
    pub fn is_unset(&self, instance: &T) -> bool {
        match self.access {
            Access::Readable(is_unset) => is_unset(instance),
            Access::WriteOnly => false,
        }
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("readable", &self.is_readable())
            .finish()
    }
}

/// Default-equality check used for unexplained destination properties.
///
/// `None`, zero, `false`, `'\0'`, empty strings and empty collections are all unset.
/// A value deliberately assigned its default is indistinguishable from one never assigned.
pub trait Unset {
    fn is_unset(&self) -> bool;
}

impl<T: Default + PartialEq> Unset for T {
    fn is_unset(&self) -> bool {
        *self == T::default()
    }
}

/// Registry key for a (source shape, destination shape) pair.
///
/// Equality and hashing only consider the two type ids; names are carried for messages.
#[derive(Debug, Clone, Copy)]
pub struct ShapePair {
    source: TypeId,
    destination: TypeId,
    source_name: &'static str,
    destination_name: &'static str,
    source_path: &'static str,
    destination_path: &'static str,
}

impl ShapePair {
    pub fn of<S: Shape, D: Shape>() -> Self {
        Self {
            source: TypeId::of::<S>(),
            destination: TypeId::of::<D>(),
            source_name: S::shape_name(),
            destination_name: D::shape_name(),
            source_path: type_name::<S>(),
            destination_path: type_name::<D>(),
        }
    }

    pub fn source_name(&self, style: TypeNameStyle) -> &'static str {
        match style {
            TypeNameStyle::Short => self.source_name,
            TypeNameStyle::Qualified => self.source_path,
        }
    }

    pub fn destination_name(&self, style: TypeNameStyle) -> &'static str {
        match style {
            TypeNameStyle::Short => self.destination_name,
            TypeNameStyle::Qualified => self.destination_path,
        }
    }
}

impl PartialEq for ShapePair {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl Eq for ShapePair {}

impl Hash for ShapePair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.destination.hash(state);
    }
}

impl fmt::Display for ShapePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_name, self.destination_name)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Names a direct field of a shape, checked at compile time.
///
/// Expands to the field name as a `&'static str`; nested paths and method calls
/// do not match the macro and fail to compile.
///
/// ```rust
/// use map_validator::prop;
///
/// pub struct OrderDto {
///     pub reference: String,
/// }
///
/// assert_eq!(prop!(OrderDto, reference), "reference");
/// ```
#[macro_export]
macro_rules! prop {
    ($shape:ty, $field:ident) => {{
        let _ = |shape: &$shape| {
            let _ = &shape.$field;
        };
        stringify!($field)
    }};
}
