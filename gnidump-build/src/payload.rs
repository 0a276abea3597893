//! KV payloads exchanged between producing and consuming phases.
//!
//! The scientific pipeline keys its store by the source's numeric
//! name-string id and stores the content-addressed uuid plus the two
//! canonical forms the index phase needs for outlink construction. The
//! vernacular store maps the source's vernacular-string id to a uuid.
//! Both are postcard-encoded.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parser projection persisted for every scientific name-string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ParsedPayload {
    /// UUID v5 of the verbatim name-string.
    pub id: String,
    /// Simple canonical form; empty when the name did not parse.
    pub canonical_simple: String,
    /// Full canonical form; empty when the name did not parse.
    pub canonical_full: String,
}

impl ParsedPayload {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(postcard::to_stdvec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

/// Vernacular payload: just the uuid of the deduplicated string.
pub(crate) fn encode_uuid(uuid: &str) -> Result<Vec<u8>> {
    Ok(postcard::to_stdvec(uuid)?)
}

pub(crate) fn decode_uuid(bytes: &[u8]) -> Result<String> {
    Ok(postcard::from_bytes(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_payload_roundtrip() {
        let payload = ParsedPayload {
            id: "16f235a0-e4a3-529c-9b83-bd15fe722110".to_string(),
            canonical_simple: "Homo sapiens".to_string(),
            canonical_full: "Homo sapiens".to_string(),
        };
        let bytes = payload.encode().unwrap();
        assert_eq!(ParsedPayload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_unparsed_payload_roundtrip() {
        let payload = ParsedPayload {
            id: "c67d76f9-2518-5844-9368-1a9140b8aa63".to_string(),
            canonical_simple: String::new(),
            canonical_full: String::new(),
        };
        let bytes = payload.encode().unwrap();
        assert_eq!(ParsedPayload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_uuid_roundtrip() {
        let bytes = encode_uuid("16f235a0-e4a3-529c-9b83-bd15fe722110").unwrap();
        assert_eq!(
            decode_uuid(&bytes).unwrap(),
            "16f235a0-e4a3-529c-9b83-bd15fe722110"
        );
    }
}
