use std::fmt;
use std::str::FromStr;

/// CountId is the process-wide monotonic integer paired with every
/// [`ShipmentId`]. It is allocated exactly once, from the database
/// sequence `shipment_countid_seq`, and never changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountId(pub i64);

impl CountId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Formats the canonical `AF-{countid:06d}` shipment id for this count.
    pub fn canonical_id(&self) -> ShipmentId {
        ShipmentId(format!("{}{:06}", ShipmentId::CANONICAL_PREFIX, self.0))
    }
}

impl fmt::Display for CountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "sqlx-support")]
impl sqlx::Type<sqlx::Postgres> for CountId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "sqlx-support")]
impl sqlx::Decode<'_, sqlx::Postgres> for CountId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'_>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        <i64 as sqlx::Decode<'_, sqlx::Postgres>>::decode(value).map(CountId)
    }
}

#[cfg(feature = "sqlx-support")]
impl sqlx::Encode<'_, sqlx::Postgres> for CountId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// ShipmentId is an opaque, prefixed shipment identifier. Canonical ids
/// carry the `AF-` prefix; legacy ids carry `AFCQ-` and resolve to a
/// canonical id when read through the store (see `shipment-store`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipmentId(String);

#[derive(Debug, thiserror::Error)]
pub enum InvalidShipmentId {
    #[error("shipment id {0:?} has neither the AF- nor AFCQ- prefix")]
    MissingPrefix(String),
}

impl ShipmentId {
    pub const CANONICAL_PREFIX: &'static str = "AF-";
    pub const LEGACY_PREFIX: &'static str = "AFCQ-";

    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidShipmentId> {
        let raw = raw.into();
        if raw.starts_with(Self::CANONICAL_PREFIX) || raw.starts_with(Self::LEGACY_PREFIX) {
            Ok(Self(raw))
        } else {
            Err(InvalidShipmentId::MissingPrefix(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_legacy(&self) -> bool {
        self.0.starts_with(Self::LEGACY_PREFIX)
    }

    pub fn is_canonical(&self) -> bool {
        self.0.starts_with(Self::CANONICAL_PREFIX)
    }

    /// The numeric suffix shared by an `AF-` id and the `AFCQ-` id it
    /// was migrated from, used by the migrator's collision check.
    pub fn numeric_suffix(&self) -> Option<&str> {
        self.0
            .strip_prefix(Self::CANONICAL_PREFIX)
            .or_else(|| self.0.strip_prefix(Self::LEGACY_PREFIX))
    }
}

impl FromStr for ShipmentId {
    type Err = InvalidShipmentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for ShipmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ShipmentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(D::Error::custom)
    }
}

#[cfg(feature = "sqlx-support")]
impl sqlx::Type<sqlx::Postgres> for ShipmentId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "sqlx-support")]
impl sqlx::Decode<'_, sqlx::Postgres> for ShipmentId {
    fn decode(
        value: sqlx::postgres::PgValueRef<'_>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <String as sqlx::Decode<'_, sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(raw)?)
    }
}

#[cfg(feature = "sqlx-support")]
impl sqlx::Encode<'_, sqlx::Postgres> for ShipmentId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'_, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_is_zero_padded() {
        let id = CountId::new(42).canonical_id();
        assert_eq!(id.as_str(), "AF-000042");
    }

    #[test]
    fn rejects_unprefixed_ids() {
        assert!(ShipmentId::parse("000042").is_err());
    }

    #[test]
    fn numeric_suffix_matches_across_prefixes() {
        let canonical = ShipmentId::parse("AF-003862").unwrap();
        let legacy = ShipmentId::parse("AFCQ-003862").unwrap();
        assert_eq!(canonical.numeric_suffix(), legacy.numeric_suffix());
    }
}
