use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three analyses the proxy knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Free-text face reading report.
    Physiognomy,
    /// Celebrity look-alike match.
    Celebrity,
    /// Compatibility ("soulmate") match.
    Soulmate,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::Physiognomy,
        AnalysisMode::Celebrity,
        AnalysisMode::Soulmate,
    ];

    /// Wire name used in the `feature` field of proxy requests.
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Physiognomy => "physiognomy",
            AnalysisMode::Celebrity => "celebrity",
            AnalysisMode::Soulmate => "soulmate",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physiognomy" => Ok(AnalysisMode::Physiognomy),
            "celebrity" => Ok(AnalysisMode::Celebrity),
            "soulmate" => Ok(AnalysisMode::Soulmate),
            other => Err(format!("unknown analysis mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisMode;

    #[test]
    fn wire_names_match_serde() {
        for mode in AnalysisMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
            assert_eq!(mode.as_str().parse::<AnalysisMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!("horoscope".parse::<AnalysisMode>().is_err());
        assert!(serde_json::from_str::<AnalysisMode>("\"horoscope\"").is_err());
    }
}
