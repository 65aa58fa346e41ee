//! Name-to-factory registry for data-driven component creation

use crate::component::Component;
use kiln_core::{AttributeValue, KilnError, Result};
use std::collections::HashMap;

/// Builds a component from the argument list of a scene description
pub type ComponentFactory = Box<dyn Fn(&[AttributeValue]) -> Result<Box<dyn Component>>>;

/// Registry of component factories keyed by type name.
///
/// Owned by the engine context and passed to whatever instantiates
/// components from data; there is no global instance.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: HashMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the components that ship with this crate
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::cage::register(&mut registry);
        crate::rewind::register(&mut registry);
        registry
    }

    /// Register a factory. Overwrites any existing factory with the same name.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F)
    where
        F: Fn(&[AttributeValue]) -> Result<Box<dyn Component>> + 'static,
    {
        let type_name = type_name.into();
        if self.factories.insert(type_name.clone(), Box::new(factory)).is_some() {
            log::debug!("Replaced component factory '{}'", type_name);
        }
    }

    /// Instantiate a component of `type_name`
    pub fn create(&self, type_name: &str, args: &[AttributeValue]) -> Result<Box<dyn Component>> {
        let factory = self.factories.get(type_name).ok_or_else(|| {
            KilnError::ConfigurationError(format!("unknown component type '{}'", type_name))
        })?;
        factory(args)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names in sorted order
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Fail with a `ConfigurationError` unless at least `count` args were supplied
pub fn require_args(type_name: &str, args: &[AttributeValue], count: usize) -> Result<()> {
    if args.len() < count {
        return Err(KilnError::ConfigurationError(format!(
            "{} requires {} argument(s), got {}",
            type_name,
            count,
            args.len()
        )));
    }
    Ok(())
}

/// Read a numeric constructor argument
pub fn float_arg(type_name: &str, args: &[AttributeValue], index: usize) -> Result<f32> {
    args.get(index).and_then(|v| v.as_f32()).ok_or_else(|| {
        KilnError::ConfigurationError(format!("{} argument {} must be a number", type_name, index))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::FrameContext;
    use crate::entity::Entity;

    struct Marker;

    impl Component for Marker {
        fn update(&mut self, _entity: &mut Entity, _ctx: &mut FrameContext<'_>) {}

        fn type_name(&self) -> Option<&str> {
            Some("Marker")
        }
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = ComponentRegistry::new();
        registry.register("Marker", |_args: &[AttributeValue]| -> Result<Box<dyn Component>> {
            Ok(Box::new(Marker))
        });

        let component = registry.create("Marker", &[]).unwrap();
        assert_eq!(component.type_name(), Some("Marker"));
        assert!(registry.contains("Marker"));
    }

    #[test]
    fn test_unknown_type_is_configuration_error() {
        let registry = ComponentRegistry::new();
        assert!(matches!(
            registry.create("Renderer", &[]),
            Err(KilnError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_builtins_present() {
        let registry = ComponentRegistry::with_builtins();
        assert_eq!(registry.type_names(), vec!["Cage", "Rewind"]);
    }

    #[test]
    fn test_arg_helpers() {
        let args = vec![AttributeValue::Float(1.0), AttributeValue::Text("x".into())];
        assert!(require_args("Cage", &args, 4).is_err());
        assert_eq!(float_arg("Cage", &args, 0).unwrap(), 1.0);
        assert!(float_arg("Cage", &args, 1).is_err());
        assert!(float_arg("Cage", &args, 5).is_err());
    }
}
