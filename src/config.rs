use std::env;
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(String),
    Invalid(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} not set", name),
            ConfigError::Invalid(name, value) => write!(f, "{} has invalid value {:?}", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub database_url: String,
    pub database_pool_size: u32,
    pub articles_dir: PathBuf,
    pub document_root_marker: String,
    pub polls_csv: Option<PathBuf>,
    pub language: String,
    /// `0` disables the limit.
    pub max_in_flight_analyses: usize,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::Missing(name.to_string()))
        };
        let number = |name: &str, default: usize| match lookup(name) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid(name.to_string(), value)),
            None => Ok(default),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_pool_size: number("DATABASE_POOL_SIZE", 10)? as u32,
            articles_dir: PathBuf::from(required("ARTICLES_DIR")?),
            document_root_marker: lookup("DOCUMENT_ROOT_MARKER").unwrap_or_else(|| "bild".to_string()),
            polls_csv: lookup("POLLS_CSV")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            language: lookup("TEXT_ANALYSIS_LANGUAGE").unwrap_or_else(|| "de".to_string()),
            max_in_flight_analyses: number("MAX_IN_FLIGHT_ANALYSES", 16)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = PipelineConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/news"),
            ("ARTICLES_DIR", "/data/bild"),
        ]))
        .unwrap();

        assert_eq!(config.document_root_marker, "bild");
        assert_eq!(config.language, "de");
        assert_eq!(config.max_in_flight_analyses, 16);
        assert_eq!(config.database_pool_size, 10);
        assert_eq!(config.polls_csv, None);
    }

    #[test]
    fn test_missing_database_url() {
        let result = PipelineConfig::from_lookup(lookup(&[("ARTICLES_DIR", "/data/bild")]));

        assert_eq!(result, Err(ConfigError::Missing("DATABASE_URL".to_string())));
    }

    #[test]
    fn test_invalid_limit_is_rejected() {
        let result = PipelineConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/news"),
            ("ARTICLES_DIR", "/data/bild"),
            ("MAX_IN_FLIGHT_ANALYSES", "many"),
        ]));

        assert!(matches!(result, Err(ConfigError::Invalid(name, _)) if name == "MAX_IN_FLIGHT_ANALYSES"));
    }

    #[test]
    fn test_unbounded_analyses_and_poll_file() {
        let config = PipelineConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/news"),
            ("ARTICLES_DIR", "/data/bild"),
            ("MAX_IN_FLIGHT_ANALYSES", "0"),
            ("POLLS_CSV", "/data/polls.csv"),
        ]))
        .unwrap();

        assert_eq!(config.max_in_flight_analyses, 0);
        assert_eq!(config.polls_csv, Some(PathBuf::from("/data/polls.csv")));
    }
}
