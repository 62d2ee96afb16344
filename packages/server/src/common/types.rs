// Common types used across multiple domains and layers
//
// These types are shared between the kernel and domain layers to avoid
// circular dependencies while maintaining type safety.

use std::collections::BTreeMap;

/// String-to-string payload attached to push messages and notification records.
///
/// Push data must be flat strings, so every handler builds its payload as one.
pub type DataMap = BTreeMap<String, String>;

/// Build a [`DataMap`] from string pairs.
pub fn data_map<const N: usize>(pairs: [(&str, &str); N]) -> DataMap {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
