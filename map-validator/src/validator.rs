use std::collections::HashSet;

use crate::builder::ValidationConfig;
use crate::shape::Shape;

/// Destination properties that are neither explained nor set.
///
/// A readable property of `D` is explained when `S` declares a property with the
/// same name (readable or not) or when `config` ignores it. Every unexplained
/// property still holding its default is returned, in `D`'s declaration order.
pub fn find_unset<S: Shape, D: Shape>(config: &ValidationConfig, destination: &D) -> Vec<&'static str> {
    let source_names: HashSet<&'static str> = S::property_names().into_iter().collect();

    D::properties()
        .into_iter()
        .filter(|p| p.is_readable())
        .filter(|p| !source_names.contains(p.name()))
        .filter(|p| !config.should_ignore(p.name()))
        .filter(|p| p.is_unset(destination))
        .map(|p| p.name())
        .collect()
}
