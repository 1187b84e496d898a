/// Errors that can occur when parsing entity identifiers.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input was empty or not a plain decimal number
    #[error("entity id must be a non-empty decimal string, got '{0}'")]
    Malformed(String),
}

/// Identifier for forms, sections and fields.
///
/// Ids are derived from the creation timestamp: the canonical form is the
/// decimal number of milliseconds since the Unix epoch, rendered as a string.
/// Ids are not globally unique, but generation is monotonic within a process,
/// so two entities created in the same millisecond still receive distinct
/// ids. Once assigned, an id never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Generates a fresh id from the current wall-clock time.
    ///
    /// If the clock reads a millisecond that has already been handed out,
    /// the previous value is bumped by one instead, keeping generated ids
    /// strictly increasing within the process.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static LAST: AtomicU64 = AtomicU64::new(0);

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut prev = LAST.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match LAST.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(candidate),
                Err(observed) => prev = observed,
            }
        }
    }

    /// Parses an id from its canonical decimal string form.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Malformed`] if the input is empty or contains
    /// anything other than a decimal number that fits in 64 bits.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        raw.parse::<u64>()
            .map(Self)
            .map_err(|_| IdError::Malformed(raw.to_string()))
    }

    /// Returns the raw millisecond value behind this id.
    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EntityId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_strictly_increasing() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        let c = EntityId::generate();
        assert!(a < b, "expected {a} < {b}");
        assert!(b < c, "expected {b} < {c}");
    }

    #[test]
    fn same_millisecond_generation_stays_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(EntityId::generate()));
        }
    }

    #[test]
    fn parse_and_display_round_trip() {
        let id = EntityId::parse("1717171717171").expect("parse id");
        assert_eq!(id.to_string(), "1717171717171");
        assert_eq!(id.as_millis(), 1_717_171_717_171);
    }

    #[test]
    fn rejects_non_decimal_input() {
        let err = EntityId::parse("not-an-id").expect_err("should reject");
        match err {
            IdError::Malformed(raw) => assert_eq!(raw, "not-an-id"),
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert!(EntityId::parse("").is_err());
    }

    #[test]
    fn serde_uses_the_canonical_string_form() {
        let id = EntityId::parse("1700000000000").expect("parse id");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"1700000000000\"");

        let back: EntityId = serde_json::from_str(&json).expect("deserialize id");
        assert_eq!(back, id);
    }
}
