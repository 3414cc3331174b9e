//! # Component Registry
//!
//! This module defines the [`Registry`], a dependency-ordered, resolve-once
//! component container. Components are registered under unique string names
//! together with the names of the components they depend on; the registry
//! resolves those dependencies eagerly, hands them to the component's factory,
//! and stores the factory's result for later lookup.
//!
//! # Architecture Note
//! Registration order *is* the dependency order: a component can only depend
//! on components registered strictly before it. There is no lazy resolution,
//! no re-registration, and no unregister operation, which rules out dependency
//! cycles by construction.
//!
//! The registry is an explicitly constructed value, not a process-wide
//! singleton. The composition root creates one, fills it, and passes the
//! resolved components out. That keeps wiring testable in isolation and
//! re-instantiable per test.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use board_framework::registry::{Component, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register("greeting", &[], |_| Some(Arc::new("hello".to_string()) as Component))
//!     .unwrap();
//! registry
//!     .register("shout", &["greeting"], |deps| {
//!         let greeting = deps[0].clone().downcast::<String>().ok()?;
//!         Some(Arc::new(greeting.to_uppercase()) as Component)
//!     })
//!     .unwrap();
//!
//! let shout = registry.lookup_as::<String>("shout").unwrap();
//! assert_eq!(*shout, "HELLO");
//! ```

use crate::error::RegistryError;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A resolved component instance: produced once by its factory, shared and
/// immutable thereafter.
pub type Component = Arc<dyn Any + Send + Sync>;

/// Dependency-ordered, resolve-once component container.
///
/// All failure modes are configuration errors (see [`RegistryError`]): they
/// indicate a wiring bug and are returned immediately, never deferred.
#[derive(Default)]
pub struct Registry {
    components: HashMap<String, Component>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component under `name`.
    ///
    /// Each entry in `dependencies` is resolved against the already-registered
    /// set and the resolved instances are passed to `factory` in declaration
    /// order. The factory's result is stored under `name` and also returned to
    /// the caller.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyRegistered`] if `name` is taken
    /// - [`RegistryError::SelfDependency`] if `dependencies` contains `name`
    /// - [`RegistryError::MissingDependency`] if a dependency is not yet
    ///   registered
    /// - [`RegistryError::EmptyComponent`] if the factory returns `None`
    pub fn register<F>(
        &mut self,
        name: &str,
        dependencies: &[&str],
        factory: F,
    ) -> Result<Component, RegistryError>
    where
        F: FnOnce(&[Component]) -> Option<Component>,
    {
        if self.components.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }

        let mut resolved = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if *dependency == name {
                return Err(RegistryError::SelfDependency(name.to_string()));
            }
            let component = self.components.get(*dependency).ok_or_else(|| {
                RegistryError::MissingDependency {
                    component: name.to_string(),
                    dependency: dependency.to_string(),
                }
            })?;
            resolved.push(component.clone());
        }

        let component =
            factory(&resolved).ok_or_else(|| RegistryError::EmptyComponent(name.to_string()))?;
        self.components.insert(name.to_string(), component.clone());
        debug!(name, ?dependencies, "Component registered");
        Ok(component)
    }

    /// Returns the component registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] if `name` was never registered.
    pub fn lookup(&self, name: &str) -> Result<Component, RegistryError> {
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))
    }

    /// Returns the component registered under `name`, downcast to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] for an unknown name and
    /// [`RegistryError::TypeMismatch`] when the stored component is not a `T`.
    pub fn lookup_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, RegistryError> {
        self.lookup(name)?
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(n: u32) -> Component {
        Arc::new(n)
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = Registry::new();
        registry.register("answer", &[], |_| Some(value(42))).unwrap();

        let answer = registry.lookup_as::<u32>("answer").unwrap();
        assert_eq!(*answer, 42);
    }

    #[test]
    fn dependencies_resolve_in_declaration_order() {
        let mut registry = Registry::new();
        registry.register("a", &[], |_| Some(value(1))).unwrap();
        registry.register("b", &[], |_| Some(value(2))).unwrap();

        registry
            .register("sum", &["a", "b"], |deps| {
                let a = deps[0].clone().downcast::<u32>().ok()?;
                let b = deps[1].clone().downcast::<u32>().ok()?;
                Some(value(*a + *b))
            })
            .unwrap();

        assert_eq!(*registry.lookup_as::<u32>("sum").unwrap(), 3);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = Registry::new();
        registry.register("dup", &[], |_| Some(value(1))).unwrap();

        let err = registry.register("dup", &[], |_| Some(value(2))).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(name) if name == "dup"));
        // The original component is untouched.
        assert_eq!(*registry.lookup_as::<u32>("dup").unwrap(), 1);
    }

    #[test]
    fn missing_dependency_is_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register("late", &["early"], |_| Some(value(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingDependency { component, dependency }
                if component == "late" && dependency == "early"
        ));
        assert!(registry.lookup("late").is_err());
    }

    #[test]
    fn self_dependency_is_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register("narcissus", &["narcissus"], |_| Some(value(1)))
            .unwrap_err();
        assert!(matches!(err, RegistryError::SelfDependency(name) if name == "narcissus"));
    }

    #[test]
    fn empty_factory_result_is_rejected() {
        let mut registry = Registry::new();
        let err = registry.register("nothing", &[], |_| None).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyComponent(name) if name == "nothing"));
        assert!(registry.lookup("nothing").is_err());
    }

    #[test]
    fn lookup_of_unregistered_name_fails() {
        let registry = Registry::new();
        let err = registry.lookup("ghost").unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered(name) if name == "ghost"));
    }

    #[test]
    fn typed_lookup_rejects_wrong_type() {
        let mut registry = Registry::new();
        registry.register("answer", &[], |_| Some(value(42))).unwrap();

        let err = registry.lookup_as::<String>("answer").unwrap_err();
        assert!(matches!(err, RegistryError::TypeMismatch { name, .. } if name == "answer"));
    }
}
