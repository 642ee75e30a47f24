//! Output formats for rendered configuration and reports.

use clap::ValueEnum;
use std::fmt;

/// Output format for `config show` and `config validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// YAML, the same shape as the config file (default)
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_enum_parse() {
        assert_eq!(OutputFormat::from_str("YAML", true), Ok(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_str("json", false), Ok(OutputFormat::Json));
        assert!(OutputFormat::from_str("markdown", true).is_err());
    }

    #[test]
    fn test_display_matches_value_names() {
        for format in OutputFormat::value_variants() {
            let name = format.to_possible_value().unwrap();
            assert_eq!(name.get_name(), format.to_string());
        }
    }
}
