//! Macro for implementing Display and FromStr for string-backed enums
//!
//! Sync types, log levels and deployment modes all cross a text boundary
//! (config files, CLI arguments, persisted rows, the caller-facing summary).
//! This macro gives them one case-insensitive parser and one lowercase
//! renderer.
//!
//! # Example
//!
//! ```rust
//! use calmirror_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum FeedMode {
//!     Window,
//!     Delta,
//! }
//!
//! impl_domain_status_conversions!(FeedMode {
//!     Window => "window",
//!     Delta => "delta",
//! });
//!
//! assert_eq!(FeedMode::Delta.to_string(), "delta");
//! assert_eq!("WINDOW".parse::<FeedMode>().unwrap(), FeedMode::Window);
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
