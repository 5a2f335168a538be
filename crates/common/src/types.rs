use serde::{Deserialize, Serialize};

/// Declares a row identifier newtype.
///
/// Identifiers are assigned by the store, start at 1 and increase
/// monotonically within their relation.
macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from its raw row value.
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw row value.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

row_id!(
    /// Identifier of a row in the Items relation.
    ItemId
);

row_id!(
    /// Identifier of a row in the Transactions relation.
    TransactionId
);

row_id!(
    /// Identifier of a row in the Updates (audit) relation.
    UpdateId
);

row_id!(
    /// Identifier of a row in the Payments relation.
    PaymentId
);
