//! JSON support: every type serialises as a string in its canonical
//! layout.

use std::fmt;

use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cal::date::Date;
use crate::cal::datetime::DateTime;
use crate::cal::time::TimeOfDay;
use crate::error::{Error, Kind};


macro_rules! canonical_string {
    ($ty:ident, $kind:expr, $expecting:literal) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where D: Deserializer<'de>,
            {
                struct LocalVisitor;

                impl Visitor<'_> for LocalVisitor {
                    type Value = $ty;

                    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                        formatter.write_str($expecting)
                    }

                    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
                    where E: serde::de::Error,
                    {
                        $ty::parse(value).map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(LocalVisitor)
            }
        }

        impl $ty {

            /// The canonical text, as a quoted JSON string.
            pub fn to_json(&self) -> Result<String, Error> {
                serde_json::to_string(self)
                    .map_err(|source| Error::Json { kind: $kind, source })
            }

            /// Decodes a value from a quoted JSON string in the canonical
            /// layout.
            pub fn from_json(json: &str) -> Result<Self, Error> {
                serde_json::from_str(json)
                    .map_err(|source| Error::Json { kind: $kind, source }.logged())
            }

            /// Overwrites this value with one decoded from JSON. On failure
            /// the value is left as it was.
            pub fn unmarshal_json(&mut self, json: &str) -> Result<(), Error> {
                *self = Self::from_json(json)?;
                Ok(())
            }
        }
    };
}

canonical_string!(Date, Kind::Date, "a date string in the YYYY-MM-DD layout");
canonical_string!(TimeOfDay, Kind::Time, "a time string in the HH:MM:SS±HH:MM layout");
canonical_string!(DateTime, Kind::DateTime, "an RFC 3339 date-time string");
