use uuid::Uuid;

use crate::error::ModelError;

macro_rules! catalog_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize)
        )]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Parses a caller-supplied id string. Malformed input is an
            /// argument error, checked before any storage work starts.
            pub fn parse(raw: &str) -> Result<Self, ModelError> {
                if raw.is_empty() {
                    return Err(ModelError::InvalidId(
                        "id cannot be empty".to_string(),
                    ));
                }
                raw.parse::<Uuid>()
                    .map(Self)
                    .map_err(|_| ModelError::InvalidId(raw.to_string()))
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
            ) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id! {
    /// Strongly typed id for primary catalog entities of every kind.
    EntityId
}

catalog_id! {
    /// Strongly typed id for purchasable price points.
    ProductId
}

catalog_id! {
    /// Strongly typed id for nested sub-items such as course parts.
    PartId
}

catalog_id! {
    /// External media reference carried by attached images.
    MediaId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        let id = EntityId::new();
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(EntityId::parse("").is_err());
        assert!(EntityId::parse("not-a-uuid").is_err());
        assert!(ProductId::parse("1234").is_err());
    }
}
