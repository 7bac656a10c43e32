use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    /// Sentence-level disagreement inside one chunk.
    Mixed,
}

impl Sentiment {
    /// Labels that are copied straight into the calculated sentiment.
    pub const DEFINITE: [Sentiment; 3] = [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
        }
    }

    pub fn is_definite(&self) -> bool {
        !matches!(self, Sentiment::Mixed)
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            "mixed" => Ok(Sentiment::Mixed),
            _ => Err(format!("Invalid sentiment label: {}", s)),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Positive".parse::<Sentiment>(), Ok(Sentiment::Positive));
        assert_eq!("MIXED".parse::<Sentiment>(), Ok(Sentiment::Mixed));
        assert!("unknown".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_definite_labels_exclude_mixed() {
        assert!(Sentiment::DEFINITE.iter().all(Sentiment::is_definite));
        assert!(!Sentiment::Mixed.is_definite());
    }
}
