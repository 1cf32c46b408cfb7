use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;

use crate::error::{MapValidatorError, Result};
use crate::shape::Shape;

/// Ignored destination properties for one source/destination pair.
///
/// Immutable once built; the registry shares it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationConfig {
    ignored_properties: BTreeSet<String>,
}

impl ValidationConfig {
    pub(crate) fn new<I>(ignored: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            ignored_properties: ignored.into_iter().collect(),
        }
    }

    /// A config with no exclusions
    pub fn empty() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive membership test.
    pub fn should_ignore(&self, property_name: &str) -> bool {
        self.ignored_properties.contains(property_name)
    }

    pub fn ignored(&self) -> impl Iterator<Item = &str> {
        self.ignored_properties.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ignored_properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ignored_properties.is_empty()
    }
}

/// Fluent builder for a [`ValidationConfig`].
///
/// `build` consumes the builder, so a builder cannot be reused once its config exists.
pub struct ConfigBuilder<S, D> {
    ignored: BTreeSet<String>,
    _shapes: PhantomData<fn() -> (S, D)>,
}

impl<S: Shape, D: Shape> ConfigBuilder<S, D> {
    pub fn new() -> Self {
        Self {
            ignored: BTreeSet::new(),
            _shapes: PhantomData,
        }
    }

    /// Exclude one destination property from the unset check.
    ///
    /// The selector is a top-level property name of `D` (or the Rust field it was
    /// declared on), typically produced by [`prop!`](crate::prop). Anything else
    /// is rejected and the ignore set is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MapValidatorError::InvalidPropertySelector`] when the selector is
    /// empty, a nested path, a call or other expression, or names no property of `D`.
    pub fn ignore(&mut self, selector: impl AsRef<str>) -> Result<&mut Self> {
        let selector = selector.as_ref();
        let property = D::find_property(selector).ok_or_else(|| {
            MapValidatorError::InvalidPropertySelector {
                selector: selector.to_string(),
                shape: D::shape_name().to_string(),
                reason: rejection_reason(selector).to_string(),
            }
        })?;

        self.ignored.insert(property.name().to_string());
        Ok(self)
    }

    pub fn build(self) -> ValidationConfig {
        ValidationConfig::new(self.ignored)
    }
}

impl<S: Shape, D: Shape> Default for ConfigBuilder<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Shape, D: Shape> fmt::Debug for ConfigBuilder<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("source", &S::shape_name())
            .field("destination", &D::shape_name())
            .field("ignored", &self.ignored)
            .finish()
    }
}

fn rejection_reason(selector: &str) -> &'static str {
    if selector.trim().is_empty() {
        "selector is empty"
    } else if selector.contains('.') {
        "nested property paths are not supported, only top-level properties can be ignored"
    } else if selector.contains('(') || selector.contains(')') {
        "method calls are not property references"
    } else if !selector.chars().all(|c| c.is_alphanumeric() || c == '_') {
        "expression must be a property access"
    } else {
        "no such property on the destination shape"
    }
}
