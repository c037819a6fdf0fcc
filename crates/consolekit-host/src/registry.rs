//! Service registry: capability registration, graph build and lookup.
//!
//! Registrations are plain factory functions keyed by a named, type-tagged
//! [`Capability`]. `ServiceCollection::build` constructs every singleton once,
//! resolving dependencies depth-first, so a missing dependency or a cycle is
//! reported at startup instead of at first use.

use crate::error::HostError;
use log::{debug, warn};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&mut ServiceResolver) -> Result<Instance, HostError>>;

/// Named key for a service of type `T` (usually a trait object).
pub struct Capability<T: ?Sized> {
    name: &'static str,
    marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Capability<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Capability<T> {}

impl<T: ?Sized> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.name)
    }
}

struct Registration {
    name: &'static str,
    factory: Factory,
}

/// Mutable set of registrations, consumed by [`ServiceCollection::build`].
#[derive(Default)]
pub struct ServiceCollection {
    registrations: Vec<Registration>,
}

impl ServiceCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a singleton built by `factory` during `build`.
    ///
    /// Registering the same capability again replaces the earlier factory.
    pub fn add_singleton<T, F>(&mut self, capability: Capability<T>, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut ServiceResolver) -> Result<Arc<T>, HostError> + 'static,
    {
        let factory: Factory = Arc::new(move |resolver: &mut ServiceResolver| {
            let service = factory(resolver)?;
            let instance: Instance = Arc::new(service);
            Ok(instance)
        });
        self.insert(capability.name(), factory)
    }

    /// Register an already constructed singleton.
    pub fn add_instance<T>(&mut self, capability: Capability<T>, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.add_singleton(capability, move |_| Ok(instance.clone()))
    }

    /// True when a registration exists for `capability`.
    pub fn contains<T: ?Sized>(&self, capability: Capability<T>) -> bool {
        self.registrations
            .iter()
            .any(|registration| registration.name == capability.name())
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Construct every registered singleton in registration order.
    pub fn build(self) -> Result<ServiceProvider, HostError> {
        let order: Vec<&'static str> = self
            .registrations
            .iter()
            .map(|registration| registration.name)
            .collect();
        let mut resolver = ServiceResolver {
            factories: self
                .registrations
                .into_iter()
                .map(|registration| (registration.name, registration.factory))
                .collect(),
            instances: HashMap::new(),
            resolving: Vec::new(),
        };
        for name in order {
            resolver.resolve(name)?;
        }
        debug!(
            "service graph built (services={})",
            resolver.instances.len()
        );
        Ok(ServiceProvider {
            instances: resolver.instances,
        })
    }

    fn insert(&mut self, name: &'static str, factory: Factory) -> &mut Self {
        match self
            .registrations
            .iter_mut()
            .find(|registration| registration.name == name)
        {
            Some(existing) => {
                warn!("replacing service registration (name={})", name);
                existing.factory = factory;
            }
            None => {
                debug!("registering service (name={})", name);
                self.registrations.push(Registration { name, factory });
            }
        }
        self
    }
}

/// Handle passed to factories for resolving their dependencies.
pub struct ServiceResolver {
    factories: HashMap<&'static str, Factory>,
    instances: HashMap<&'static str, Instance>,
    resolving: Vec<&'static str>,
}

impl ServiceResolver {
    /// Resolve a dependency, constructing it first if needed.
    pub fn get<T>(&mut self, capability: Capability<T>) -> Result<Arc<T>, HostError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve(capability.name())?;
        downcast(capability, &instance)
    }

    fn resolve(&mut self, name: &'static str) -> Result<Instance, HostError> {
        if let Some(instance) = self.instances.get(name) {
            return Ok(instance.clone());
        }
        if let Some(start) = self.resolving.iter().position(|pending| *pending == name) {
            let mut cycle: Vec<String> = self.resolving[start..]
                .iter()
                .map(|pending| pending.to_string())
                .collect();
            cycle.push(name.to_string());
            return Err(HostError::CircularDependency(cycle));
        }
        let factory = self
            .factories
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::MissingService {
                name: name.to_string(),
                required_by: self.resolving.last().map(|pending| pending.to_string()),
            })?;

        self.resolving.push(name);
        debug!("constructing service (name={})", name);
        let result = factory(self);
        self.resolving.pop();

        let instance = result?;
        self.instances.insert(name, instance.clone());
        Ok(instance)
    }
}

/// Immutable service graph owning one instance per capability.
pub struct ServiceProvider {
    instances: HashMap<&'static str, Instance>,
}

impl ServiceProvider {
    /// Fetch a constructed service.
    pub fn get<T>(&self, capability: Capability<T>) -> Result<Arc<T>, HostError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance =
            self.instances
                .get(capability.name())
                .ok_or_else(|| HostError::MissingService {
                    name: capability.name().to_string(),
                    required_by: None,
                })?;
        downcast(capability, instance)
    }

    pub fn contains<T: ?Sized>(&self, capability: Capability<T>) -> bool {
        self.instances.contains_key(capability.name())
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

fn downcast<T>(capability: Capability<T>, instance: &Instance) -> Result<Arc<T>, HostError>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| HostError::TypeMismatch {
            name: capability.name().to_string(),
        })
}
