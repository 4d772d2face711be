//! Runtime mode configuration for Marquee.

use serde::{Deserialize, Serialize};

/// Runtime mode for Marquee services.
///
/// Controls whether to use the real external services or built-in development
/// data. This allows offline development while maintaining the same interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeMode {
    /// Production mode - uses the TMDB catalog and the hosted document store
    Production,
    /// Development mode - uses the built-in catalog and an in-memory store
    Development,
}

impl RuntimeMode {
    /// True when the built-in offline backends are selected.
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// True when the real external services are selected.
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Default for RuntimeMode {
    fn default() -> Self {
        // Development needs no credentials, so it is the safe default.
        Self::Development
    }
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Development => write!(f, "development"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(format!("Unknown mode '{s}', expected 'production' or 'development'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("production".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
        assert_eq!("prod".parse::<RuntimeMode>(), Ok(RuntimeMode::Production));
        assert_eq!("DEV".parse::<RuntimeMode>(), Ok(RuntimeMode::Development));
        assert!("staging".parse::<RuntimeMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [RuntimeMode::Production, RuntimeMode::Development] {
            assert_eq!(mode.to_string().parse::<RuntimeMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_default_is_development() {
        assert!(RuntimeMode::default().is_development());
        assert!(!RuntimeMode::default().is_production());
    }
}
