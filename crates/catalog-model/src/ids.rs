#![deny(unsafe_code)]

use std::fmt;

use sha2::Digest;

use crate::ModelError;

/// Natural key of a series (e.g. `M8-COMPACT-4`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SeriesCode(String);

impl SeriesCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidSeriesCode(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SeriesCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeriesCode> for String {
    fn from(value: SeriesCode) -> Self {
        value.0
    }
}

impl fmt::Display for SeriesCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Natural key of a product.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidSku(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Sku {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque record identifier.
///
/// Ids minted by this workspace are the first 16 bytes of a SHA-256 digest,
/// rendered as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId([u8; 16]);

impl RecordId {
    pub fn from_first_16_bytes_of_sha256(digest: [u8; 32]) -> Self {
        let mut out = [0u8; 16];
        out.copy_from_slice(&digest[..16]);
        Self(out)
    }

    /// Deterministic id for an entity kind and its natural key:
    /// sha256("<entity>\0<natural_key>").
    pub fn derive(entity: &str, natural_key: &str) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(entity.as_bytes());
        hasher.update([0u8]);
        hasher.update(natural_key.as_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        Self::from_first_16_bytes_of_sha256(digest)
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let bytes =
            hex::decode(value).map_err(|_| ModelError::InvalidRecordId(value.to_string()))?;
        if bytes.len() != 16 {
            return Err(ModelError::InvalidRecordId(value.to_string()));
        }
        let mut out = [0u8; 16];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_is_deterministic() {
        let a = RecordId::derive("product", "PROD-001");
        let b = RecordId::derive("product", "PROD-001");
        let c = RecordId::derive("product", "PROD-002");
        let d = RecordId::derive("series", "PROD-001");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(RecordId::parse(&a.to_hex()).unwrap(), a);
    }

    #[test]
    fn natural_keys_are_trimmed_and_non_empty() {
        assert_eq!(Sku::new("  PROD-1 ").unwrap().as_str(), "PROD-1");
        assert!(Sku::new("   ").is_err());
        assert!(SeriesCode::new("").is_err());
    }
}
