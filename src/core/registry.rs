//! Singleton dependency-injection registry.
//!
//! Components annotated with `#[service]` or `#[repository]` register a
//! constructor through `inventory` at compile time. `ServiceLocator` resolves
//! them lazily as process-wide singletons and detects circular dependencies
//! while a constructor chain is running. Infrastructure that is not macro
//! managed (the Mongo `Database`, the `RedisClient`) is registered manually
//! from `main` via [`ServiceLocator::set`].

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::{debug, error, info};
use once_cell::sync::Lazy;

/// Common interface implemented by every `#[service]` struct.
#[async_trait]
pub trait Service: Send + Sync {
    /// Registry key for this service.
    fn name(&self) -> &str;

    /// One-time setup hook, called after construction.
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Common interface implemented by every `#[repository]` struct.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Registry key for this repository.
    fn name(&self) -> &str;

    /// Backing MongoDB collection name.
    fn collection_name(&self) -> &str;

    /// One-time setup hook (index creation and the like).
    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Registration record emitted by the `#[service]` macro.
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// Registration record emitted by the `#[repository]` macro.
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

/// Name → registration lookup, built once on first access.
static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let mut cache = HashMap::new();

    for registration in inventory::iter::<ServiceRegistration>() {
        let clean_name = extract_clean_name_static(registration.name);
        cache.insert(clean_name, registration);
    }

    debug!("service name cache initialized ({} entries)", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> =
    Lazy::new(|| {
        let mut cache = HashMap::new();

        for registration in inventory::iter::<RepositoryRegistration>() {
            let clean_name = extract_clean_name_static(registration.name);
            cache.insert(clean_name, registration);
        }

        debug!("repository name cache initialized ({} entries)", cache.len());
        cache
    });

/// Normalizes macro-generated names (`cart_service`, `cart_repository`) to a
/// bare entity key so they can be matched against type names.
fn extract_clean_name_static(name: &str) -> String {
    if name.ends_with("_service") {
        name[..name.len() - 8].to_string()
    } else if name.ends_with("_repository") {
        name[..name.len() - 11].to_string()
    } else {
        name.to_string()
    }
}

/// Global singleton container.
///
/// Instances are cached by `TypeId`; the `initializing` set tracks types whose
/// constructors are currently on the stack so a dependency cycle fails fast
/// instead of deadlocking.
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    /// Resolves the singleton instance for `T`, constructing it on first use.
    ///
    /// Panics on circular dependencies, unregistered types, and registration
    /// type mismatches. Those are wiring bugs and should stop the process at
    /// startup rather than surface per request.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        {
            let instances = LOCATOR.instances.read().unwrap();
            if let Some(instance) = instances.get(&type_id) {
                return instance
                    .clone()
                    .downcast::<T>()
                    .expect("Type mismatch in ServiceLocator");
            }
        }

        {
            let initializing = LOCATOR.initializing.read().unwrap();
            if initializing.contains(&type_id) {
                error!("circular dependency detected for type: {}", type_name);
                panic!(
                    "Circular dependency detected: {} is already being initialized",
                    type_name
                );
            }
        }
        {
            let mut initializing = LOCATOR.initializing.write().unwrap();
            initializing.insert(type_id);
        }

        let result = std::panic::catch_unwind(|| {
            let mut instances = LOCATOR.instances.write().unwrap();

            // Double check under the write lock.
            if let Some(instance) = instances.get(&type_id) {
                return instance
                    .clone()
                    .downcast::<T>()
                    .expect("Type mismatch in ServiceLocator");
            }

            let clean_type_name = Self::extract_clean_type_name(type_name);

            if clean_type_name.contains("Repository") {
                // "CartRepository" -> "cart"
                let entity_name = clean_type_name
                    .strip_suffix("Repository")
                    .unwrap_or(&clean_type_name)
                    .to_lowercase();

                if let Some(registration) = REPOSITORY_NAME_CACHE.get(&entity_name) {
                    let boxed_instance = (registration.constructor)();

                    if let Ok(arc_instance) = boxed_instance.downcast::<Arc<T>>() {
                        let instance = (*arc_instance).clone();
                        instances.insert(type_id, instance.clone() as Arc<dyn Any + Send + Sync>);
                        return instance;
                    } else {
                        panic!("Type mismatch for repository: {}", registration.name);
                    }
                } else {
                    panic!("No repository found for entity: {}", entity_name);
                }
            }

            if clean_type_name.contains("Service") {
                // "CartService" -> "cart"
                let entity_name = clean_type_name
                    .strip_suffix("Service")
                    .unwrap_or(&clean_type_name)
                    .to_lowercase();

                if let Some(registration) = SERVICE_NAME_CACHE.get(&entity_name) {
                    let boxed_instance = (registration.constructor)();

                    if let Ok(arc_instance) = boxed_instance.downcast::<Arc<T>>() {
                        let instance = (*arc_instance).clone();
                        instances.insert(type_id, instance.clone() as Arc<dyn Any + Send + Sync>);
                        return instance;
                    } else {
                        panic!("Type mismatch for service: {}", registration.name);
                    }
                } else {
                    panic!("No service found for entity: {}", entity_name);
                }
            }

            panic!(
                "Service not found: {}. Make sure it's registered with #[service] or #[repository] macro, or manually registered with ServiceLocator::set()",
                type_name
            );
        });

        {
            let mut initializing = LOCATOR.initializing.write().unwrap();
            initializing.remove(&type_id);
        }

        match result {
            Ok(instance) => instance,
            Err(e) => {
                let mut initializing = LOCATOR.initializing.write().unwrap();
                initializing.remove(&type_id);

                error!("failed to create instance for {}: {:?}", type_name, e);
                panic!("Failed to create instance for {}", type_name);
            }
        }
    }

    /// `std::any::type_name` includes the full module path; keep only the
    /// trailing segment for registry matching.
    fn extract_clean_type_name(type_name: &str) -> String {
        if let Some(pos) = type_name.rfind("::") {
            type_name[pos + 2..].to_string()
        } else {
            type_name.to_string()
        }
    }

    /// Registers an externally constructed instance (Database, RedisClient,
    /// configuration objects) under its concrete type.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();
        let clean_name = Self::extract_clean_type_name(type_name);

        info!("registering infrastructure component: {}", clean_name);

        let mut instances = LOCATOR.instances.write().unwrap();
        instances.insert(type_id, instance as Arc<dyn Any + Send + Sync>);
    }

    /// Eagerly constructs every registered component. Repositories first so
    /// index creation happens before any service touches a collection.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        let repo_registrations: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repo_registrations.len();

        for registration in repo_registrations {
            debug!("creating repository: {}", registration.name);
            let _boxed_instance = (registration.constructor)();
        }

        let service_registrations: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        let service_count = service_registrations.len();

        for registration in service_registrations {
            debug!("creating service: {}", registration.name);
            let _boxed_instance = (registration.constructor)();
        }

        info!(
            "service registry ready ({} repositories, {} services)",
            repo_count, service_count
        );

        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_name_strips_service_suffix() {
        assert_eq!(extract_clean_name_static("cart_service"), "cart");
        assert_eq!(extract_clean_name_static("payment_repository"), "payment");
        assert_eq!(extract_clean_name_static("plain"), "plain");
    }

    #[test]
    fn clean_type_name_drops_module_path() {
        assert_eq!(
            ServiceLocator::extract_clean_type_name("crate::services::cart::CartService"),
            "CartService"
        );
        assert_eq!(ServiceLocator::extract_clean_type_name("Database"), "Database");
    }
}
