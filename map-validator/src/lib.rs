//! Completeness guard for object-to-object mapping code
//!
//! After a destination value has been populated from a source value, this crate
//! checks that every destination property the source cannot explain has been
//! handled deliberately: either explicitly ignored, or assigned something other
//! than its type's default. It does not check that copied values are correct.
//!
//! # Core Concepts
//!
//! - **Shape**: a type with an ordered table of named public properties, usually
//!   produced by `#[derive(Shape)]`
//! - **Explained property**: a destination property whose name also exists on the
//!   source shape (exact, case-sensitive match)
//! - **Ignored property**: a destination property excluded through [`ConfigBuilder::ignore`]
//! - **Unset property**: an unexplained, non-ignored property still equal to its default
//!
//! # Example
//!
//! ```rust
//! use map_validator::{prop, MapValidator, Shape};
//!
//! #[derive(Shape)]
//! pub struct Customer {
//!     pub id: u64,
//! }
//!
//! #[derive(Shape, Default)]
//! pub struct CustomerDto {
//!     pub id: u64,
//!     pub display_name: String,
//!     pub cached_at: Option<u64>,
//! }
//!
//! # fn main() -> map_validator::Result<()> {
//! let validator = MapValidator::new();
//! validator.configure_with::<Customer, CustomerDto, _>(|rules| {
//!     rules.ignore(prop!(CustomerDto, cached_at))?;
//!     Ok(())
//! })?;
//!
//! let dto = CustomerDto { id: 7, ..CustomerDto::default() };
//! let err = validator.validate::<Customer, CustomerDto>(&dto).unwrap_err();
//! assert_eq!(err.unset_properties(), ["display_name"]);
//! # Ok(())
//! # }
//! ```

extern crate self as map_validator;

pub mod builder;
pub mod config;
pub mod error;
pub mod registry;
pub mod shape;
pub mod validator;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use registry::*;
pub use shape::*;

pub use map_validator_macros::Shape;

/// Register an empty config for `S -> D` on the global registry.
pub fn configure<S: Shape, D: Shape>() {
    MapValidator::global().configure::<S, D>();
}

/// Register a config for `S -> D` on the global registry.
///
/// # Errors
///
/// Propagates the first error returned by `setup`.
pub fn configure_with<S, D, F>(setup: F) -> Result<()>
where
    S: Shape,
    D: Shape,
    F: FnOnce(&mut ConfigBuilder<S, D>) -> Result<()>,
{
    MapValidator::global().configure_with::<S, D, F>(setup)
}

/// Validate `destination` against the global registry.
///
/// # Errors
///
/// See [`MapValidator::validate`].
pub fn validate<S: Shape, D: Shape>(destination: &D) -> Result<()> {
    MapValidator::global().validate::<S, D>(destination)
}

/// Unset properties of `destination` according to the global registry.
///
/// # Errors
///
/// See [`MapValidator::unset_properties`].
pub fn unset_properties<S: Shape, D: Shape>(destination: &D) -> Result<Vec<&'static str>> {
    MapValidator::global().unset_properties::<S, D>(destination)
}
