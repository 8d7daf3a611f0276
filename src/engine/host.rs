//! engine::host
//!
//! Process state that shapes an invocation, captured once per operation.
//!
//! The invocation builders never query the environment themselves; they
//! receive a [`HostEnv`] instead. Tests construct one directly.

use std::path::PathBuf;

use crate::core::naming::normalize_username;

/// Host facts read at the start of an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    /// Current working directory, `None` if it could not be determined.
    pub working_dir: Option<PathBuf>,

    /// Value of `DISPLAY`, if set and non-empty.
    pub display: Option<String>,

    /// Name of the invoking user.
    pub username: String,
}

impl HostEnv {
    /// Capture the current process state.
    ///
    /// A `cwd_override` stands in for the process working directory.
    /// Failures to read the working directory are recorded as `None`; they
    /// only become errors when an invocation actually needs the directory.
    pub fn capture(cwd_override: Option<PathBuf>) -> Self {
        let working_dir = match cwd_override {
            Some(dir) => Some(dir),
            None => match std::env::current_dir() {
                Ok(dir) => Some(dir),
                Err(e) => {
                    log::warn!("failed to get working directory: {}", e);
                    None
                }
            },
        };

        let display = std::env::var("DISPLAY").ok().filter(|d| !d.is_empty());

        Self {
            working_dir,
            display,
            username: current_username(),
        }
    }
}

/// Name of the invoking user, normalized with [`normalize_username`].
///
/// Falls back to `$USER`, then to `"unknown"`, when the user database has
/// no entry for the current uid (as in some containers).
pub fn current_username() -> String {
    let raw = raw_username().unwrap_or_default();
    let name = normalize_username(&raw);
    if name != raw {
        log::debug!("using username {:?} for {:?}", name, raw);
    }
    name
}

fn raw_username() -> Option<String> {
    if let Some(name) = users::get_current_username() {
        match name.into_string() {
            Ok(name) => return Some(name),
            Err(name) => log::warn!("username {:?} is not valid UTF-8", name),
        }
    }

    std::env::var("USER").ok().filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_uses_override() {
        let host = HostEnv::capture(Some(PathBuf::from("/work/project")));
        assert_eq!(host.working_dir, Some(PathBuf::from("/work/project")));
    }

    #[test]
    fn username_is_never_empty() {
        assert!(!current_username().is_empty());
    }

    #[test]
    fn username_is_reference_and_path_safe() {
        let name = current_username();
        assert!(name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!name.starts_with('-'));
    }
}
