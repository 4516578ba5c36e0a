//! Status helper enums mapping to SMALLINT columns.
//!
//! Each enum variant's discriminant is the value stored in the database.
//! Variants also carry a snake_case name used on the wire; input accepts
//! either form.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant, in id order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the wire name.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( x if x == $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $label => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct StatusVisitor;

                impl<'de> Visitor<'de> for StatusVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                        write!(f, "a {} name or id", stringify!($name))
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<$name, E> {
                        $name::from_name(v)
                            .or_else(|| v.parse::<StatusId>().ok().and_then($name::from_id))
                            .ok_or_else(|| E::custom(format!("unknown status '{v}'")))
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<$name, E> {
                        StatusId::try_from(v)
                            .ok()
                            .and_then($name::from_id)
                            .ok_or_else(|| E::custom(format!("unknown status id {v}")))
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<$name, E> {
                        StatusId::try_from(v)
                            .ok()
                            .and_then($name::from_id)
                            .ok_or_else(|| E::custom(format!("unknown status id {v}")))
                    }
                }

                deserializer.deserialize_any(StatusVisitor)
            }
        }
    };
}

define_status_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Unknown = 0 => "unknown",
        Open = 1 => "open",
        Scheduled = 2 => "scheduled",
        InDevelopment = 3 => "in_development",
        Completed = 4 => "completed",
        Cancelled = 5 => "cancelled",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_names_round_trip() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_id(status.id()), Some(*status));
            assert_eq!(ProjectStatus::from_name(status.name()), Some(*status));
        }
        assert_eq!(ProjectStatus::InDevelopment.id(), 3);
        assert_eq!(ProjectStatus::from_id(6), None);
    }

    #[test]
    fn deserializes_from_name_or_number() {
        let by_name: ProjectStatus = serde_json::from_str("\"in_development\"").unwrap();
        let by_id: ProjectStatus = serde_json::from_str("5").unwrap();
        assert_eq!(by_name, ProjectStatus::InDevelopment);
        assert_eq!(by_id, ProjectStatus::Cancelled);
        assert!(serde_json::from_str::<ProjectStatus>("\"paused\"").is_err());
        assert!(serde_json::from_str::<ProjectStatus>("-1").is_err());
        // Query strings carry ids as text.
        let by_text_id: ProjectStatus = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(by_text_id, ProjectStatus::Scheduled);
    }

    #[test]
    fn serializes_as_name() {
        let json = serde_json::to_value(ProjectStatus::Scheduled).unwrap();
        assert_eq!(json, "scheduled");
    }
}
