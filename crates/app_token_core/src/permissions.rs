//! Parser for caller-requested permission subsets.
//!
//! Token permissions arrive as a single comma-separated string of
//! `name:level` pairs, e.g. `"contents:write,pull_requests:read"`. The
//! parser turns that string into a validated name-to-level map, or fails
//! with a diagnostic precise enough for the caller to fix the workflow
//! definition. It never returns a partial map.

use std::collections::BTreeMap;

use crate::errors::Error;

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;

/// A validated mapping from permission name to access level.
///
/// Keys never contain a dash and values are always `"read"` or `"write"`.
/// An empty map is valid and means no restriction was requested, in which
/// case the token gets the installation's full configured grant.
pub type PermissionMap = BTreeMap<String, String>;

/// The access levels GitHub accepts for an installation token permission.
const VALID_LEVELS: [&str; 2] = ["read", "write"];

/// Parses a comma-separated permission specification.
///
/// Entries are trimmed; empty entries (trailing commas, whitespace-only
/// input) are skipped. A duplicate name silently overwrites the earlier
/// occurrence; the last one wins.
///
/// Validation runs per entry in a fixed order: entry format, empty name,
/// empty level, dash in the name, level value. The dash check runs before
/// level validation so that the most common real-world mistake (copying
/// GitHub Actions workflow-permission syntax, which uses dashes) gets the
/// correction hint rather than a less useful level complaint.
///
/// # Errors
///
/// Returns an `Error::Validation` describing the first malformed entry.
///
/// # Example
///
/// ```
/// use app_token_core::parse_permissions;
///
/// let map = parse_permissions("contents:write,pull_requests:read").unwrap();
/// assert_eq!(map["contents"], "write");
/// assert_eq!(map["pull_requests"], "read");
/// ```
pub fn parse_permissions(input: &str) -> Result<PermissionMap, Error> {
    let mut map = PermissionMap::new();

    for raw_entry in input.split(',') {
        let entry = raw_entry.trim();
        if entry.is_empty() {
            continue;
        }

        let mut parts = entry.split(':');
        let (Some(name), Some(level), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::Validation(format!(
                "Invalid permission entry \"{entry}\". Expected format: \"name:level\" \
                 (e.g., \"contents:write\", \"pull_requests:read\")."
            )));
        };

        let name = name.trim();
        let level = level.trim();

        if name.is_empty() {
            return Err(Error::Validation(format!(
                "Invalid permission entry \"{entry}\". Permission name cannot be empty."
            )));
        }

        if level.is_empty() {
            return Err(Error::Validation(format!(
                "Invalid permission entry \"{entry}\". Permission level cannot be empty."
            )));
        }

        if name.contains('-') {
            let suggestion = name.replace('-', "_");
            return Err(Error::Validation(format!(
                "Invalid permission key \"{name}\". GitHub App permissions use underscores, \
                 not dashes. Did you mean \"{suggestion}\"? (Note: GitHub Actions workflow \
                 permissions use dashes like \"pull-requests\", but GitHub App token \
                 permissions use underscores like \"pull_requests\".)"
            )));
        }

        if !VALID_LEVELS.contains(&level) {
            return Err(Error::Validation(format!(
                "Invalid permission level \"{level}\" for \"{name}\". Must be one of: read, write."
            )));
        }

        map.insert(name.to_string(), level.to_string());
    }

    Ok(map)
}
