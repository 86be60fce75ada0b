//! Wire enums for job and pod states.
//!
//! States travel as their full names (`JOB_STATE_RUNNING`). Callers may also
//! use the short form (`RUNNING`); it is expanded by prefixing the enum's
//! wire prefix, so the same wait helpers serve both naming schemes. Names
//! the harness does not know decode to the `Invalid` variant.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::prelude::*;

macro_rules! wire_state {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Prefix shared by every wire name of this enum.
            pub const PREFIX: &'static str = $prefix;

            /// Every known state, in wire order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Full wire name.
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }

            /// Wire name without the prefix.
            pub fn short_name(&self) -> &'static str {
                &self.name()[Self::PREFIX.len()..]
            }

            fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $( $wire => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Invalid
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(value: &str) -> Result<Self> {
                let upper = value.trim().to_ascii_uppercase();
                let full = if upper.starts_with(Self::PREFIX) {
                    upper
                } else {
                    format!("{}{}", Self::PREFIX, upper)
                };
                Self::from_wire(&full).ok_or_else(|| Error::InvalidState(value.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> core::result::Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from_wire(&value).unwrap_or_default())
            }
        }
    };
}

wire_state! {
    /// Runtime state of a stateless job.
    JobState, "JOB_STATE_" {
        Invalid => "JOB_STATE_INVALID",
        Initialized => "JOB_STATE_INITIALIZED",
        Pending => "JOB_STATE_PENDING",
        Running => "JOB_STATE_RUNNING",
        Succeeded => "JOB_STATE_SUCCEEDED",
        Failed => "JOB_STATE_FAILED",
        Killed => "JOB_STATE_KILLED",
        Killing => "JOB_STATE_KILLING",
        Uninitialized => "JOB_STATE_UNINITIALIZED",
        Deleted => "JOB_STATE_DELETED",
    }
}

wire_state! {
    /// Runtime state of a single pod.
    PodState, "POD_STATE_" {
        Invalid => "POD_STATE_INVALID",
        Initialized => "POD_STATE_INITIALIZED",
        Pending => "POD_STATE_PENDING",
        Ready => "POD_STATE_READY",
        Placing => "POD_STATE_PLACING",
        Placed => "POD_STATE_PLACED",
        Launching => "POD_STATE_LAUNCHING",
        Launched => "POD_STATE_LAUNCHED",
        Starting => "POD_STATE_STARTING",
        Running => "POD_STATE_RUNNING",
        Succeeded => "POD_STATE_SUCCEEDED",
        Failed => "POD_STATE_FAILED",
        Lost => "POD_STATE_LOST",
        Preempting => "POD_STATE_PREEMPTING",
        Killing => "POD_STATE_KILLING",
        Killed => "POD_STATE_KILLED",
        Deleted => "POD_STATE_DELETED",
    }
}
