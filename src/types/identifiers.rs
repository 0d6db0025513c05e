//! Unique identifier types for the production line simulator
//!
//! Identifiers label reports, never simulation results, so seeded runs stay
//! byte-for-byte reproducible.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportId(pub Uuid);

impl ReportId {
    /// Create a new random report ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RPT_{}", self.0.simple())
    }
}

impl Serialize for ReportId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ReportId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("RPT_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(ReportId(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_unique() {
        assert_ne!(ReportId::new(), ReportId::new());
    }

    #[test]
    fn test_report_id_display() {
        let id = ReportId::new();
        assert!(id.to_string().starts_with("RPT_"));
        assert_eq!(id.to_string().len(), 4 + 32);
    }

    #[test]
    fn test_report_id_serde() {
        let id = ReportId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let parsed: ReportId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);

        let raw: ReportId = serde_json::from_str(&format!("\"{}\"", id.0)).unwrap();
        assert_eq!(raw, id);
    }
}
