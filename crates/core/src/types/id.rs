//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! The order API is loose about id encoding: the same entity can arrive as a
//! JSON number (`"id": 4`) or a JSON string (`"id": "4"`). IDs therefore keep
//! a canonical string form and deserialize from either representation.

use serde::Deserializer;
use serde::de::{Error as DeError, Visitor};

/// Deserialize an id from either a JSON string or a JSON integer.
///
/// # Errors
///
/// Returns an error for any other JSON type.
#[doc(hidden)]
pub fn deserialize_flexible<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlexibleIdVisitor;

    impl Visitor<'_> for FlexibleIdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: DeError>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(FlexibleIdVisitor)
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around the id's canonical string form with:
/// - `Serialize` with `#[serde(transparent)]` (ids are sent back as strings)
/// - `Deserialize` accepting both JSON strings and JSON integers
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>`, and `From<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use jwt_pizza_core::define_id;
/// define_id!(VendorId);
/// define_id!(CouponId);
///
/// let vendor_id = VendorId::new("1");
/// let coupon_id = CouponId::from(1);
///
/// // These are different types, so this won't compile:
/// // let _: VendorId = coupon_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the canonical string form.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_flexible(deserializer).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id.to_string())
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(MenuItemId);
define_id!(FranchiseId);
define_id!(StoreId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let id: UserId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(id, UserId::new("3"));
    }

    #[test]
    fn test_deserialize_from_number() {
        let id: MenuItemId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_deserialize_rejects_other_types() {
        assert!(serde_json::from_str::<StoreId>("true").is_err());
        assert!(serde_json::from_str::<StoreId>("[1]").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let id = FranchiseId::from(1);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1\"");
    }

    #[test]
    fn test_string_and_number_forms_are_equal() {
        let from_str: StoreId = serde_json::from_str("\"4\"").unwrap();
        let from_num: StoreId = serde_json::from_str("4").unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderId::from(23).to_string(), "23");
    }
}
