//! Dot-separated field paths
//!
//! Paths address nested fields the same way validation diagnostics spell
//! them: `"address.city"` names the `city` field of the `address` map.
//! Array elements are not addressable by path; projection and migration
//! treat arrays as opaque values.

/// Split a dot-separated path into its segments.
///
/// An empty path yields no segments and addresses the root itself.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}
