use serde::Serialize;

use crate::domain::flags::{Flag, FlagSet};
use crate::domain::membership::Tier;

/// Flags as the client sees them.
#[derive(Debug, Clone, Serialize)]
pub struct FlagsResponse {
    /// `None` for anonymous callers and for tier names this build doesn't know.
    pub tier: Option<Tier>,
    pub flags: FlagSet,
    /// Names of the flags that are on.
    pub enabled: Vec<Flag>,
    /// Whether a debug override was applied to this response.
    pub overridden: bool,
}
