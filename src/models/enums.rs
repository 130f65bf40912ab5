//! Shared domain enums (visit purposes, export periods)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// VisitPurpose
// ---------------------------------------------------------------------------

/// Reason given by the visitor at check-in.
///
/// Serialized as the Indonesian tag shown on the kiosk form. Any string is
/// accepted when deserializing: the Indonesian tags and English names are
/// matched case-insensitively, everything else becomes [`VisitPurpose::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VisitPurpose {
    #[default]
    Reading,
    Borrowing,
    Returning,
    Studying,
    Wifi,
    Other,
}

impl VisitPurpose {
    pub const ALL: [VisitPurpose; 6] = [
        VisitPurpose::Reading,
        VisitPurpose::Borrowing,
        VisitPurpose::Returning,
        VisitPurpose::Studying,
        VisitPurpose::Wifi,
        VisitPurpose::Other,
    ];

    /// Tag stored in the cache and sent to the sheet
    pub fn tag(&self) -> &'static str {
        match self {
            VisitPurpose::Reading => "Membaca",
            VisitPurpose::Borrowing => "Meminjam",
            VisitPurpose::Returning => "Mengembalikan",
            VisitPurpose::Studying => "Belajar",
            VisitPurpose::Wifi => "Wifi",
            VisitPurpose::Other => "Lainnya",
        }
    }

    fn english(&self) -> &'static str {
        match self {
            VisitPurpose::Reading => "reading",
            VisitPurpose::Borrowing => "borrowing",
            VisitPurpose::Returning => "returning",
            VisitPurpose::Studying => "studying",
            VisitPurpose::Wifi => "wifi",
            VisitPurpose::Other => "other",
        }
    }

    /// Lenient parse, never fails
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.tag().eq_ignore_ascii_case(value) || p.english().eq_ignore_ascii_case(value))
            .unwrap_or(VisitPurpose::Other)
    }
}

impl From<String> for VisitPurpose {
    fn from(s: String) -> Self {
        VisitPurpose::parse(&s)
    }
}

impl From<VisitPurpose> for String {
    fn from(p: VisitPurpose) -> Self {
        p.tag().to_string()
    }
}

impl std::fmt::Display for VisitPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ---------------------------------------------------------------------------
// ExportPeriod
// ---------------------------------------------------------------------------

/// Time bucket used to filter visitors before export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportPeriod {
    #[default]
    All,
    Daily,
    Weekly,
    Monthly,
}

impl ExportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportPeriod::All => "all",
            ExportPeriod::Daily => "daily",
            ExportPeriod::Weekly => "weekly",
            ExportPeriod::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for ExportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ExportPeriod::All),
            "daily" => Ok(ExportPeriod::Daily),
            "weekly" => Ok(ExportPeriod::Weekly),
            "monthly" => Ok(ExportPeriod::Monthly),
            other => Err(format!("Unknown export period: {}", other)),
        }
    }
}

impl std::fmt::Display for ExportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_parse() {
        assert_eq!(VisitPurpose::parse("Membaca"), VisitPurpose::Reading);
        assert_eq!(VisitPurpose::parse("meminjam"), VisitPurpose::Borrowing);
        assert_eq!(VisitPurpose::parse("Studying"), VisitPurpose::Studying);
        assert_eq!(VisitPurpose::parse(" WIFI "), VisitPurpose::Wifi);
        assert_eq!(VisitPurpose::parse("Event"), VisitPurpose::Other);
        assert_eq!(VisitPurpose::parse(""), VisitPurpose::Other);
    }

    #[test]
    fn test_purpose_serde_uses_tag() {
        let json = serde_json::to_string(&VisitPurpose::Returning).unwrap();
        assert_eq!(json, "\"Mengembalikan\"");

        let parsed: VisitPurpose = serde_json::from_str("\"Diskusi\"").unwrap();
        assert_eq!(parsed, VisitPurpose::Other);
    }

    #[test]
    fn test_export_period_from_str() {
        assert_eq!("Daily".parse::<ExportPeriod>(), Ok(ExportPeriod::Daily));
        assert_eq!("monthly".parse::<ExportPeriod>(), Ok(ExportPeriod::Monthly));
        assert!("yearly".parse::<ExportPeriod>().is_err());
    }
}
