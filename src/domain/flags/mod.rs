//! Feature flags.
//!
//! # Module Structure
//!
//! - `flag_set` - Flag names, complete and partial flag sets
//! - `overrides` - Debug override payload decoding and signing
//! - `resolver` - Defaults → tier preset → override merge

mod flag_set;
mod overrides;
mod resolver;

pub use flag_set::{Flag, FlagSet, PartialFlags, UnknownFlag};
pub use overrides::{
    OverrideCodec, OverrideError, OverrideSource, OVERRIDE_COOKIE, OVERRIDE_HEADER,
};
pub use resolver::FlagResolver;
