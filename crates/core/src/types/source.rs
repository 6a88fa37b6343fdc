//! Customer acquisition channels.

use serde::{Deserialize, Serialize};

/// How a walk-in customer found the branch.
///
/// Submissions must name one of these channels exactly; the read path is
/// lenient because the ledger predates the enum (see [`Source::from_cell`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "Google Ads")]
    GoogleAds,
    #[serde(rename = "Facebook/Instagram")]
    FacebookInstagram,
    #[serde(rename = "Word of Mouth")]
    WordOfMouth,
    #[serde(rename = "Walk-by")]
    WalkBy,
    #[serde(rename = "JustDial")]
    JustDial,
    #[serde(rename = "Old Customer")]
    OldCustomer,
    #[serde(rename = "Architect/Contractor")]
    ArchitectContractor,
    #[serde(rename = "Other")]
    Other,
}

impl Source {
    /// All channels, in presentation order.
    pub const ALL: [Self; 8] = [
        Self::GoogleAds,
        Self::FacebookInstagram,
        Self::WordOfMouth,
        Self::WalkBy,
        Self::JustDial,
        Self::OldCustomer,
        Self::ArchitectContractor,
        Self::Other,
    ];

    /// Returns the wire/display name of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoogleAds => "Google Ads",
            Self::FacebookInstagram => "Facebook/Instagram",
            Self::WordOfMouth => "Word of Mouth",
            Self::WalkBy => "Walk-by",
            Self::JustDial => "JustDial",
            Self::OldCustomer => "Old Customer",
            Self::ArchitectContractor => "Architect/Contractor",
            Self::Other => "Other",
        }
    }

    /// Lenient parse for stored row cells.
    ///
    /// Rows appended before the channel list was fixed may carry arbitrary
    /// strings; those map to [`Source::Other`] rather than failing the read.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        cell.parse().unwrap_or(Self::Other)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| UnknownSource(s.to_owned()))
    }
}

/// Error returned when a submitted source string is not a known channel.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown source: {0}")]
pub struct UnknownSource(pub String);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse_round_trips_all_channels() {
        for source in Source::ALL {
            let parsed: Source = source.as_str().parse().unwrap();
            assert_eq!(parsed, source);
        }
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!("Billboard".parse::<Source>().is_err());
    }

    #[test]
    fn test_lenient_parse_falls_back_to_other() {
        assert_eq!(Source::from_cell("Billboard"), Source::Other);
        assert_eq!(Source::from_cell(""), Source::Other);
        assert_eq!(Source::from_cell("JustDial"), Source::JustDial);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Source::WalkBy).unwrap();
        assert_eq!(json, "\"Walk-by\"");

        let parsed: Source = serde_json::from_str("\"Word of Mouth\"").unwrap();
        assert_eq!(parsed, Source::WordOfMouth);
    }
}
