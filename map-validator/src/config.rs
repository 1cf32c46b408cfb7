// Validator configuration
use serde::{Deserialize, Serialize};

/// How shape names are rendered in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNameStyle {
    /// `Shape::shape_name`, e.g. `CustomerDto`
    #[default]
    Short,
    /// `std::any::type_name`, e.g. `billing::dto::CustomerDto`
    Qualified,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    pub type_names: TypeNameStyle,
}

impl ValidatorSettings {
    pub fn with_type_names(mut self, style: TypeNameStyle) -> Self {
        self.type_names = style;
        self
    }
}
