//! Typed identifiers
//!
//! Entities (tables) and variables (columns) are identified by typed string
//! wrappers. The wrappers keep the two namespaces from mixing and give
//! consistent serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Borrow the identifier as a string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an entity (a table of rows)
    EntityId
);

define_id!(
    /// Unique identifier for a variable (a column of an entity)
    VariableId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = EntityId::from("transactions");
        assert_eq!(id.as_str(), "transactions");
        assert_eq!(id.to_string(), "transactions");
        assert_eq!(id, EntityId::new("transactions"));
    }
}
