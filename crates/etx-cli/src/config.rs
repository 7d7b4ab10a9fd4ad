use std::path::Path;

use anyhow::Context;
use etx_ledger::LedgerConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    ledger: LedgerConfig,
}

/// Read the `[ledger]` table from `path`, or use defaults when no path
/// is given.
pub fn load(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    let Some(path) = path else {
        return Ok(LedgerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn parse(text: &str) -> anyhow::Result<LedgerConfig> {
    let file: ConfigFile = toml::from_str(text)?;
    Ok(file.ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load(None).unwrap(), LedgerConfig::default());
    }

    #[test]
    fn reads_ledger_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]\nregular_buyer_threshold = 2\nincremental_aggregation = true").unwrap();
        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.regular_buyer_threshold, 2);
        assert!(config.incremental_aggregation);
        assert_eq!(config.index_buckets, 100_003);
    }

    #[test]
    fn missing_table_is_default() {
        assert_eq!(parse("").unwrap(), LedgerConfig::default());
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(parse("[ledger]\nindex_buckets = \"many\"").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
