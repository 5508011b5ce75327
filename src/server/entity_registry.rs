//! Registry of entity descriptors and the CRUD routes they contribute

use axum::Router;

/// Describes how to mount the routes of one entity
///
/// Implemented by each entity module (see `PizzaDescriptor`,
/// `ToppingDescriptor`).
pub trait EntityDescriptor: Send + Sync {
    /// Singular entity name (e.g., "topping")
    fn entity_type(&self) -> &str;

    /// Plural path segment (e.g., "toppings")
    fn plural(&self) -> &str;

    /// Routes relative to the base path, with state already applied
    ///
    /// - `GET|POST /{plural}`
    /// - `GET|PUT|PATCH|DELETE /{plural}/{id}`
    fn build_routes(&self) -> Router;
}

/// Entity descriptors in registration order
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: Vec<Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any earlier one for the same entity
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        self.descriptors
            .retain(|existing| existing.entity_type() != descriptor.entity_type());
        self.descriptors.push(descriptor);
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .iter()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Collection paths relative to the base path (e.g., "/pizzas")
    pub fn collection_paths(&self) -> Vec<String> {
        self.descriptors
            .iter()
            .map(|d| format!("/{}", d.plural()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticDescriptor {
        singular: &'static str,
        plural: &'static str,
    }

    impl EntityDescriptor for StaticDescriptor {
        fn entity_type(&self) -> &str {
            self.singular
        }

        fn plural(&self) -> &str {
            self.plural
        }

        fn build_routes(&self) -> Router {
            Router::new()
        }
    }

    fn descriptor(singular: &'static str, plural: &'static str) -> Box<dyn EntityDescriptor> {
        Box::new(StaticDescriptor { singular, plural })
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = EntityRegistry::new();
        registry.register(descriptor("pizza", "pizzas"));
        registry.register(descriptor("topping", "toppings"));
        assert_eq!(registry.collection_paths(), vec!["/pizzas", "/toppings"]);
    }

    #[test]
    fn test_register_same_entity_replaces() {
        let mut registry = EntityRegistry::new();
        registry.register(descriptor("topping", "toppings"));
        registry.register(descriptor("topping", "extras"));
        assert_eq!(registry.collection_paths(), vec!["/extras"]);
    }

    #[test]
    fn test_empty_registry_builds_router() {
        let registry = EntityRegistry::default();
        assert!(registry.collection_paths().is_empty());
        let _router = registry.build_routes();
    }
}
