//! Macros for reducing boilerplate when defining entities
//!
//! These macros generate the repetitive trait implementations needed for
//! each persisted record, its field enum and its wire types.

/// Implement identity equality for a type with an `id: Option<i64>` field
///
/// Two values are equal only when both carry an identifier and the
/// identifiers match. A value without an identifier equals nothing, itself
/// included, so the relation is not `Eq`.
#[macro_export]
macro_rules! impl_identity_eq {
    ($( $type:ty ),+ $(,)?) => {
        $(
            impl PartialEq for $type {
                fn eq(&self, other: &Self) -> bool {
                    matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
                }
            }
        )+
    };
}

/// Implement [`Identified`](crate::core::entity::Identified) for wire types
/// with an `id: Option<i64>` field
#[macro_export]
macro_rules! impl_identified {
    ($( $type:ty ),+ $(,)?) => {
        $(
            impl $crate::core::entity::Identified for $type {
                fn id(&self) -> Option<i64> {
                    self.id
                }
            }
        )+
    };
}

/// Define a persisted entity together with its field enum
///
/// Generates:
/// - the struct, with `id: Option<i64>` followed by the listed members
/// - a `Copy` field enum with an `Id` variant plus one variant per member
/// - `EntityField` for the enum (wire name and column name per variant)
/// - `Entity` for the struct
/// - identity equality and a `new` constructor for unsaved records
///
/// # Example
/// ```rust,ignore
/// impl_entity!(
///     Topping, "topping", "toppings",
///     ToppingField {
///         Name => name: String = ("name", "name"),
///         Description => description: Option<String> = ("description", "description"),
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident, $singular:expr, $plural:expr,
        $field_enum:ident {
            $(
                $(#[$meta:meta])*
                $variant:ident => $member:ident : $member_type:ty = ($wire:expr, $column:expr)
            ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone)]
        pub struct $type {
            /// Identifier, absent until first saved
            pub id: Option<i64>,
            $(
                $(#[$meta])*
                pub $member: $member_type,
            )*
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $field_enum {
            Id,
            $( $variant ),*
        }

        impl $crate::core::entity::EntityField for $field_enum {
            fn all() -> &'static [Self] {
                &[$field_enum::Id, $( $field_enum::$variant ),*]
            }

            fn id() -> Self {
                $field_enum::Id
            }

            fn name(&self) -> &'static str {
                match self {
                    $field_enum::Id => "id",
                    $( $field_enum::$variant => $wire, )*
                }
            }

            fn column(&self) -> &'static str {
                match self {
                    $field_enum::Id => "id",
                    $( $field_enum::$variant => $column, )*
                }
            }
        }

        impl $crate::core::entity::Entity for $type {
            type Field = $field_enum;

            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn assign_id(&mut self, id: i64) {
                self.id = Some(id);
            }

            fn field_value(&self, field: $field_enum) -> $crate::core::field::FieldValue {
                match field {
                    $field_enum::Id => self.id.into(),
                    $( $field_enum::$variant => self.$member.clone().into(), )*
                }
            }
        }

        $crate::impl_identity_eq!($type);

        impl $type {
            /// Create an unsaved record
            pub fn new($( $member: $member_type ),*) -> Self {
                Self {
                    id: None,
                    $( $member ),*
                }
            }
        }
    };
}
