//! core::naming
//!
//! Naming scheme for the container images codo builds.
//!
//! Every image is namespaced under the invoking user so that several users
//! on one host never collide on image names.

/// Prefix shared by every image reference codo produces.
pub const IMAGE_PREFIX: &str = "codo";

/// Build the fully-qualified image reference for a user's image.
///
/// # Example
///
/// ```
/// use codo::core::naming::full_image_reference;
///
/// assert_eq!(full_image_reference("alice", "dev"), "codo-alice-dev");
/// ```
pub fn full_image_reference(username: &str, image_name: &str) -> String {
    format!("{}-{}-{}", IMAGE_PREFIX, username, image_name)
}

/// Reduce an account name to a form safe in references and paths.
///
/// ASCII letters are lowercased, digits kept, and every other character
/// becomes `-`. Leading and trailing `-` are dropped. A name with nothing
/// left becomes `"unknown"`.
///
/// ```
/// use codo::core::naming::normalize_username;
///
/// assert_eq!(normalize_username("Alice"), "alice");
/// assert_eq!(normalize_username("../root"), "root");
/// ```
pub fn normalize_username(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = mapped.trim_matches('-');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}
