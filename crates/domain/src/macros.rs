//! Macro for implementing Display and FromStr for status-like enums
//!
//! Channel codes, grades and catalog statuses are persisted and sent on the
//! wire as strings. The macro keeps the string form in one place and parses
//! it back case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use channelsync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum DeliveryState {
//!     Queued,
//!     Delivered,
//! }
//!
//! impl_domain_status_conversions!(DeliveryState {
//!     Queued => "queued",
//!     Delivered => "delivered",
//! });
//!
//! assert_eq!(DeliveryState::Queued.to_string(), "queued");
//! assert_eq!("DELIVERED".parse::<DeliveryState>().unwrap(), DeliveryState::Delivered);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Display writes the mapped string verbatim; FromStr accepts any ASCII
/// casing of it. Unknown input yields a descriptive `String` error naming the
/// enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
