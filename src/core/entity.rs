//! Entity traits defining the persisted records served by the API

use crate::core::field::FieldValue;
use std::fmt::Debug;

/// Base trait for every persisted record.
///
/// An entity carries an optional identifier: `None` before the first save,
/// `Some(id)` once a store has assigned one. Equality between entities is
/// identity equality (see [`impl_identity_eq!`](crate::impl_identity_eq)).
///
/// Implementations are generated by [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Closed set of fields that can be filtered and sorted on
    type Field: EntityField;

    /// The plural resource name used in URLs (e.g., "toppings")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "topping")
    fn resource_name_singular() -> &'static str;

    /// The identifier, absent until the entity has been saved
    fn id(&self) -> Option<i64>;

    /// Bind the identifier chosen by a store.
    ///
    /// Stores only call this for entities whose id is still absent.
    fn assign_id(&mut self, id: i64);

    /// Read a field as a [`FieldValue`]
    fn field_value(&self, field: Self::Field) -> FieldValue;
}

/// A field of an [`Entity`], named on the wire and in storage
pub trait EntityField: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every field, in declaration order
    fn all() -> &'static [Self];

    /// The identifier field
    fn id() -> Self;

    /// Name used in JSON bodies and query parameters
    fn name(&self) -> &'static str;

    /// Column name used by SQL stores
    fn column(&self) -> &'static str;

    /// Look a field up by its wire name
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|field| field.name() == name)
    }
}

/// Wire representation of an entity that carries an optional identifier
pub trait Identified {
    fn id(&self) -> Option<i64>;
}
