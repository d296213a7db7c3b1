//! Settings resolution.
//!
//! Each value comes from an explicit override, then an environment
//! variable, then a default. Empty strings count as unset.

use std::env;
use std::path::PathBuf;

/// Database path variable.
pub const DB_VAR: &str = "ACTBOARD_DB";
/// Current user variable.
pub const USER_VAR: &str = "ACTBOARD_USER";
/// Current group variable.
pub const GROUP_VAR: &str = "ACTBOARD_GROUP";

/// Fallback for the current user.
const SYSTEM_USER_VAR: &str = "USER";

/// Default database file, relative to the working directory.
pub const DEFAULT_DB: &str = "actboard.db";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub user: String,
    pub group: String,
}

/// Values given explicitly (usually from CLI flags).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub user: Option<String>,
    pub group: Option<String>,
}

impl Settings {
    /// Resolve settings against the process environment.
    ///
    /// Resolution order for the user:
    /// 1. Explicit override (`--user`)
    /// 2. `ACTBOARD_USER`
    /// 3. `USER`
    #[must_use]
    pub fn resolve(overrides: Overrides) -> Self {
        Self::resolve_with(overrides, |name| env::var(name).ok())
    }

    /// Resolve settings using `lookup` in place of the environment.
    pub fn resolve_with(overrides: Overrides, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let db_path = overrides
            .db_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| lookup(DB_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        let user = non_empty(overrides.user)
            .or_else(|| lookup(USER_VAR))
            .or_else(|| lookup(SYSTEM_USER_VAR))
            .unwrap_or_default();

        let group = non_empty(overrides.group)
            .or_else(|| lookup(GROUP_VAR))
            .unwrap_or_default();

        Self {
            db_path,
            user,
            group,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
