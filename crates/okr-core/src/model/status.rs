use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Health of an objective or key result for the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Off Track")]
    OffTrack,
    /// Any status string outside the three known values.
    #[default]
    #[serde(other)]
    Unknown,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::OnTrack, Self::AtRisk, Self::OffTrack];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::OffTrack => "Off Track",
            Self::Unknown => "Unknown",
        }
    }

    /// Semantic color slot used by every renderer.
    #[must_use]
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::OnTrack => StatusTone::Green,
            Self::AtRisk => StatusTone::Amber,
            Self::OffTrack => StatusTone::Red,
            Self::Unknown => StatusTone::Gray,
        }
    }
}

/// Status color slots. The hex values are the dashboard palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Green,
    Amber,
    Red,
    Gray,
}

impl StatusTone {
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#10B981",
            Self::Amber => "#F59E0B",
            Self::Red => "#EF4444",
            Self::Gray => "#64748B",
        }
    }

    /// RGB triple of [`StatusTone::hex`].
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Green => (0x10, 0xB9, 0x81),
            Self::Amber => (0xF5, 0x9E, 0x0B),
            Self::Red => (0xEF, 0x44, 0x44),
            Self::Gray => (0x64, 0x74, 0x8B),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a status from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub got: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status: '{}' (expected one of: ", self.got)?;
        for (index, status) in Status::ALL.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(status.as_str())?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ParseStatusError {}

fn normalize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_ascii_lowercase()
}

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ontrack" => Ok(Self::OnTrack),
            "atrisk" => Ok(Self::AtRisk),
            "offtrack" => Ok(Self::OffTrack),
            _ => Err(ParseStatusError { got: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Status, StatusTone};
    use std::str::FromStr;

    #[test]
    fn status_json_uses_display_strings() {
        assert_eq!(
            serde_json::to_string(&Status::OnTrack).unwrap(),
            "\"On Track\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"Off Track\"").unwrap(),
            Status::OffTrack
        );
    }

    #[test]
    fn unrecognized_status_deserializes_as_unknown() {
        assert_eq!(
            serde_json::from_str::<Status>("\"Blocked\"").unwrap(),
            Status::Unknown
        );
    }

    #[test]
    fn parse_accepts_loose_spellings() {
        assert_eq!(Status::from_str("on-track").unwrap(), Status::OnTrack);
        assert_eq!(Status::from_str(" AT_RISK ").unwrap(), Status::AtRisk);
        assert_eq!(Status::from_str("offtrack").unwrap(), Status::OffTrack);
        let err = Status::from_str("done").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid status: 'done' (expected one of: On Track, At Risk, Off Track)"
        );
    }

    #[test]
    fn tone_mapping_matches_palette() {
        assert_eq!(Status::OnTrack.tone(), StatusTone::Green);
        assert_eq!(Status::AtRisk.tone(), StatusTone::Amber);
        assert_eq!(Status::OffTrack.tone(), StatusTone::Red);
        assert_eq!(Status::Unknown.tone(), StatusTone::Gray);
        assert_eq!(StatusTone::Amber.hex(), "#F59E0B");
    }

    #[test]
    fn display_parse_roundtrips() {
        for status in Status::ALL {
            assert_eq!(Status::from_str(&status.to_string()).unwrap(), status);
        }
    }
}
