//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigOverrides, SyncConfig};
use crate::error::Result;

/// Sync the latest GitHub release of an app into an AltStore source
#[derive(Debug, Parser)]
#[command(name = "altsource-sync", version, about)]
pub struct Cli {
    /// TOML file with defaults for the options below
    #[arg(short, long, env = "ALTSOURCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub project to query (e.g. "afyef/XP-App")
    #[arg(short, long, env = "ALTSOURCE_REPO")]
    pub repo: Option<String>,

    /// Release asset to record (e.g. "XP.ipa")
    #[arg(short, long, env = "ALTSOURCE_ASSET")]
    pub asset: Option<String>,

    /// Catalog JSON file to update [default: app-repo.json]
    #[arg(long, env = "ALTSOURCE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// GitHub API base URL [default: https://api.github.com]
    #[arg(long, env = "ALTSOURCE_API_URL")]
    pub api_url: Option<String>,

    /// Record release notes exactly as published
    #[arg(long, env = "ALTSOURCE_NO_CLEAN_NOTES")]
    pub no_clean_notes: bool,

    /// Leave the app description untouched
    #[arg(long, env = "ALTSOURCE_NO_FIX_DESCRIPTIONS")]
    pub no_fix_descriptions: bool,

    /// Show what would change without writing the catalog
    #[arg(long, env = "ALTSOURCE_DRY_RUN")]
    pub dry_run: bool,
}

impl Cli {
    /// Resolve the final configuration: config file first, then flags.
    pub fn into_config(self) -> Result<SyncConfig> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::from_file(path)?,
            None => SyncConfig::default(),
        };

        ConfigOverrides {
            project_id: self.repo,
            expected_asset_name: self.asset,
            catalog_path: self.catalog,
            api_base_url: self.api_url,
            clean_notes: self.no_clean_notes.then_some(false),
            fix_descriptions: self.no_fix_descriptions.then_some(false),
            dry_run: self.dry_run.then_some(true),
        }
        .apply(&mut config);

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_only() {
        let cli = Cli::try_parse_from([
            "altsource-sync",
            "--repo",
            "afyef/XP-App",
            "--asset",
            "XP.ipa",
            "--no-clean-notes",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.project_id, "afyef/XP-App");
        assert_eq!(config.expected_asset_name, "XP.ipa");
        assert_eq!(config.catalog_path, PathBuf::from("app-repo.json"));
        assert!(!config.clean_notes);
        assert!(config.fix_descriptions);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("altsource.toml");
        std::fs::write(
            &path,
            "project_id = \"u/r\"\nexpected_asset_name = \"R.ipa\"\ndry_run = false\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "altsource-sync",
            "--config",
            path.to_str().unwrap(),
            "--asset",
            "Other.ipa",
            "--dry-run",
        ])
        .unwrap();

        let config = cli.into_config().unwrap();
        assert_eq!(config.project_id, "u/r");
        assert_eq!(config.expected_asset_name, "Other.ipa");
        assert!(config.dry_run);
    }

    #[test]
    fn test_missing_repo_rejected() {
        let cli = Cli::try_parse_from(["altsource-sync", "--asset", "XP.ipa"]).unwrap();
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_every_flag_reads_environment() {
        use clap::CommandFactory;

        let command = Cli::command();
        let expected = [
            ("config", "ALTSOURCE_CONFIG"),
            ("repo", "ALTSOURCE_REPO"),
            ("asset", "ALTSOURCE_ASSET"),
            ("catalog", "ALTSOURCE_CATALOG"),
            ("api_url", "ALTSOURCE_API_URL"),
            ("no_clean_notes", "ALTSOURCE_NO_CLEAN_NOTES"),
            ("no_fix_descriptions", "ALTSOURCE_NO_FIX_DESCRIPTIONS"),
            ("dry_run", "ALTSOURCE_DRY_RUN"),
        ];
        for (id, var) in expected {
            let arg = command
                .get_arguments()
                .find(|a| a.get_id() == id)
                .unwrap_or_else(|| panic!("no argument {id}"));
            assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new(var)), "{id}");
        }
    }
}
