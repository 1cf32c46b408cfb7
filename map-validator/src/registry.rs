use std::sync::Arc;

use dashmap::DashMap;
use lazy_static::lazy_static;
use tracing::{debug, trace};

use crate::builder::{ConfigBuilder, ValidationConfig};
use crate::config::ValidatorSettings;
use crate::error::{MapValidatorError, Result};
use crate::shape::{Shape, ShapePair};
use crate::validator::find_unset;

lazy_static! {
    static ref GLOBAL_VALIDATOR: MapValidator = MapValidator::new();
}

/// Registry of per-pair validation configs and the entry point for validation.
///
/// Configs are stored behind `Arc` in a sharded concurrent map: registering a pair
/// swaps the whole config, so concurrent readers see either the old or the new one.
#[derive(Debug, Default)]
pub struct MapValidator {
    configurations: DashMap<ShapePair, Arc<ValidationConfig>>,
    settings: ValidatorSettings,
}

impl MapValidator {
    pub fn new() -> Self {
        Self::with_settings(ValidatorSettings::default())
    }

    pub fn with_settings(settings: ValidatorSettings) -> Self {
        Self {
            configurations: DashMap::new(),
            settings,
        }
    }

    /// Process-wide registry, created on first use with default settings
    pub fn global() -> &'static MapValidator {
        &GLOBAL_VALIDATOR
    }

    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    // =============================================================================
    // Registration
    // =============================================================================

    /// Register the config produced by `setup` for `S -> D`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `setup` (usually an invalid `ignore`
    /// selector). Nothing is registered in that case.
    pub fn configure_with<S, D, F>(&self, setup: F) -> Result<()>
    where
        S: Shape,
        D: Shape,
        F: FnOnce(&mut ConfigBuilder<S, D>) -> Result<()>,
    {
        let mut builder = ConfigBuilder::new();
        setup(&mut builder)?;
        self.store(ShapePair::of::<S, D>(), builder.build());
        Ok(())
    }

    /// Register an empty config (no ignored properties) for `S -> D`.
    pub fn configure<S: Shape, D: Shape>(&self) {
        self.store(ShapePair::of::<S, D>(), ValidationConfig::empty());
    }

    fn store(&self, pair: ShapePair, config: ValidationConfig) {
        let ignored = config.len();
        let replaced = self.configurations.insert(pair, Arc::new(config)).is_some();

        debug!(
            source = pair.source_name(self.settings.type_names),
            destination = pair.destination_name(self.settings.type_names),
            ignored,
            replaced,
            "Registered mapping validation config"
        );
    }

    pub fn config<S: Shape, D: Shape>(&self) -> Option<Arc<ValidationConfig>> {
        self.lookup(&ShapePair::of::<S, D>())
    }

    pub fn is_configured<S: Shape, D: Shape>(&self) -> bool {
        self.configurations.contains_key(&ShapePair::of::<S, D>())
    }

    /// Drop the config for `S -> D`. Returns whether one was registered.
    pub fn remove<S: Shape, D: Shape>(&self) -> bool {
        let pair = ShapePair::of::<S, D>();
        let removed = self.configurations.remove(&pair).is_some();
        if removed {
            debug!(pair = %pair, "Removed mapping validation config");
        }
        removed
    }

    pub fn clear(&self) {
        self.configurations.clear();
        debug!("Cleared mapping validation configs");
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    fn lookup(&self, pair: &ShapePair) -> Option<Arc<ValidationConfig>> {
        self.configurations
            .get(pair)
            .map(|entry| Arc::clone(entry.value()))
    }

    // =============================================================================
    // Validation
    // =============================================================================

    /// Names of unexplained destination properties still at their default.
    ///
    /// # Errors
    ///
    /// Returns [`MapValidatorError::ConfigurationMissing`] when `S -> D` was never configured.
    pub fn unset_properties<S: Shape, D: Shape>(&self, destination: &D) -> Result<Vec<&'static str>> {
        let pair = ShapePair::of::<S, D>();
        let config = self
            .lookup(&pair)
            .ok_or_else(|| MapValidatorError::ConfigurationMissing {
                source_shape: pair.source_name(self.settings.type_names).to_string(),
                destination_shape: pair.destination_name(self.settings.type_names).to_string(),
            })?;

        Ok(find_unset::<S, D>(&config, destination))
    }

    /// Check that every destination property not explained by `S` or ignored has been set.
    ///
    /// # Errors
    ///
    /// - [`MapValidatorError::ConfigurationMissing`] when `S -> D` was never configured
    /// - [`MapValidatorError::ValidationFailed`] listing every property left at its default
    pub fn validate<S: Shape, D: Shape>(&self, destination: &D) -> Result<()> {
        let unset = self.unset_properties::<S, D>(destination)?;
        let destination_shape = ShapePair::of::<S, D>().destination_name(self.settings.type_names);

        if unset.is_empty() {
            trace!(destination = destination_shape, "Mapping validation passed");
            return Ok(());
        }

        trace!(
            destination = destination_shape,
            unset = unset.len(),
            "Mapping validation found unset properties"
        );

        Err(MapValidatorError::ValidationFailed {
            destination_shape: destination_shape.to_string(),
            unset: unset.into_iter().map(str::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeNameStyle;
    use crate::shape::{Property, Unset};

    struct Customer;

    impl Shape for Customer {
        fn properties() -> Vec<Property<Self>> {
            vec![Property::write_only("Id", "id")]
        }
    }

    struct CustomerDto {
        id: u32,
        name: String,
        tier: u8,
    }

    impl Shape for CustomerDto {
        fn properties() -> Vec<Property<Self>> {
            vec![
                Property::readable("Id", "id", |c: &Self| c.id.is_unset()),
                Property::readable("Name", "name", |c: &Self| c.name.is_unset()),
                Property::readable("Tier", "tier", |c: &Self| c.tier.is_unset()),
            ]
        }
    }

    fn dto(name: &str, tier: u8) -> CustomerDto {
        CustomerDto {
            id: 1,
            name: name.to_string(),
            tier,
        }
    }

    #[test]
    fn test_configure_registers_empty_config() {
        let validator = MapValidator::new();
        assert!(validator.is_empty());
        assert!(!validator.is_configured::<Customer, CustomerDto>());

        validator.configure::<Customer, CustomerDto>();

        assert!(validator.is_configured::<Customer, CustomerDto>());
        assert!(!validator.is_configured::<CustomerDto, Customer>());
        assert_eq!(validator.len(), 1);
        assert!(validator.config::<Customer, CustomerDto>().unwrap().is_empty());
    }

    #[test]
    fn test_reconfigure_replaces_instead_of_merging() {
        let validator = MapValidator::new();
        validator
            .configure_with::<Customer, CustomerDto, _>(|b| {
                b.ignore("Name")?.ignore("Tier")?;
                Ok(())
            })
            .unwrap();
        validator
            .configure_with::<Customer, CustomerDto, _>(|b| {
                b.ignore("Tier")?;
                Ok(())
            })
            .unwrap();

        let config = validator.config::<Customer, CustomerDto>().unwrap();
        assert_eq!(config.ignored().collect::<Vec<_>>(), ["Tier"]);
        assert_eq!(validator.len(), 1);

        validator.configure::<Customer, CustomerDto>();
        assert!(validator.config::<Customer, CustomerDto>().unwrap().is_empty());
    }

    #[test]
    fn test_failed_setup_registers_nothing() {
        let validator = MapValidator::new();
        validator.configure::<Customer, CustomerDto>();

        let err = validator
            .configure_with::<Customer, CustomerDto, _>(|b| {
                b.ignore("Tier")?.ignore("tier.level")?;
                Ok(())
            })
            .unwrap_err();

        assert!(matches!(err, MapValidatorError::InvalidPropertySelector { .. }));
        assert!(validator.config::<Customer, CustomerDto>().unwrap().is_empty());
    }

    #[test]
    fn test_validate_requires_configuration() {
        let validator = MapValidator::new();
        validator.configure::<CustomerDto, Customer>();

        let err = validator.validate::<Customer, CustomerDto>(&dto("x", 1)).unwrap_err();
        assert_eq!(
            err,
            MapValidatorError::ConfigurationMissing {
                source_shape: "Customer".to_string(),
                destination_shape: "CustomerDto".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_lists_every_unset_property() {
        let validator = MapValidator::new();
        validator.configure::<Customer, CustomerDto>();

        // Id is explained by the write-only source property
        let err = validator
            .validate::<Customer, CustomerDto>(&CustomerDto {
                id: 0,
                name: String::new(),
                tier: 0,
            })
            .unwrap_err();
        assert_eq!(err.unset_properties(), ["Name", "Tier"]);
        assert_eq!(err.to_string(), "Required fields not set on CustomerDto: Name, Tier");

        assert!(validator.validate::<Customer, CustomerDto>(&dto("x", 2)).is_ok());
    }

    #[test]
    fn test_unset_properties_reports_without_failing() {
        let validator = MapValidator::new();
        validator
            .configure_with::<Customer, CustomerDto, _>(|b| {
                b.ignore("Name")?;
                Ok(())
            })
            .unwrap();

        assert_eq!(
            validator.unset_properties::<Customer, CustomerDto>(&dto("", 0)).unwrap(),
            ["Tier"]
        );
        assert!(validator
            .unset_properties::<Customer, CustomerDto>(&dto("", 3))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let validator = MapValidator::new();
        validator.configure::<Customer, CustomerDto>();
        validator.configure::<CustomerDto, Customer>();

        assert!(validator.remove::<Customer, CustomerDto>());
        assert!(!validator.remove::<Customer, CustomerDto>());
        assert_eq!(validator.len(), 1);

        validator.clear();
        assert!(validator.is_empty());
    }

    #[test]
    fn test_qualified_type_names_in_errors() {
        let validator = MapValidator::with_settings(
            ValidatorSettings::default().with_type_names(TypeNameStyle::Qualified),
        );

        let err = validator.validate::<Customer, CustomerDto>(&dto("x", 1)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("registry::tests::Customer -> "));
        assert!(message.contains("registry::tests::CustomerDto"));
    }
}
