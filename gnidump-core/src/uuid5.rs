//! Deterministic identifiers for name-strings.
//!
//! Every id in the target schema is a UUID v5 computed in the GlobalNames
//! namespace, which is itself the UUID v5 of `globalnames.org` in the DNS
//! namespace. The same text always hashes to the same id, across runs and
//! across implementations.

use std::sync::LazyLock;
use uuid::Uuid;

/// The GlobalNames namespace: `UUIDv5(DNS, "globalnames.org")`.
pub static GN_NAMESPACE: LazyLock<Uuid> =
    LazyLock::new(|| Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"globalnames.org"));

/// Returns the UUID v5 of `name` in the GlobalNames namespace.
pub fn gn_uuid(name: &str) -> Uuid {
    Uuid::new_v5(&GN_NAMESPACE, name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_is_stable() {
        // The namespace itself is content-addressed, not random.
        assert_eq!(
            GN_NAMESPACE.to_string(),
            "90181196-fecf-5082-a4c1-411d4f314cda"
        );
    }

    #[test]
    fn test_same_name_same_uuid() {
        assert_eq!(gn_uuid("Homo sapiens"), gn_uuid("Homo sapiens"));
        assert_ne!(gn_uuid("Homo sapiens"), gn_uuid("Homo sapiens L."));
    }

    #[test]
    fn test_known_value() {
        // Pinned so a refactor of the namespace derivation cannot slip by.
        assert_eq!(
            gn_uuid("Homo sapiens").to_string(),
            "16f235a0-e4a3-529c-9b83-bd15fe722110"
        );
    }
}
