//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

use crate::cell_ref::{parse_cell_ref, CellPosition};

/// An infinite canvas of spreadsheet panels
#[derive(Parser, Debug)]
#[command(
    name = "cellchain",
    version,
    about = "An infinite canvas of spreadsheet panels"
)]
pub struct CliArgs {
    /// CSV/TSV files to open as panels
    #[arg(value_name = "CSV_FILES")]
    pub files: Vec<PathBuf>,

    /// Canvas manifest to use instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Don't load the manifest at startup
    #[arg(long)]
    pub no_restore: bool,

    /// Cell to select in the first panel, e.g. B3
    #[arg(long, value_name = "CELL", value_parser = parse_cell_ref)]
    pub select: Option<CellPosition>,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Files opened synchronously as panels
    pub files: Vec<PathBuf>,
    /// Manifest override; the configured `state_file` is used when unset
    pub state_path: Option<PathBuf>,
    /// Load the manifest before opening `files`
    pub restore: bool,
    /// Initial selection in the first panel
    pub select: Option<CellPosition>,
}

impl CliArgs {
    pub fn into_config(self) -> StartupConfig {
        StartupConfig {
            files: self.files,
            state_path: self.state,
            restore: !self.no_restore,
            select: self.select,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_args_restore_by_default() {
        let config = CliArgs::parse_from(["cellchain"]).into_config();
        assert!(config.files.is_empty());
        assert!(config.restore);
        assert_eq!(config.state_path, None);
        assert_eq!(config.select, None);
    }

    #[test]
    fn test_files_and_state_override() {
        let config =
            CliArgs::parse_from(["cellchain", "a.csv", "b.tsv", "--state", "work.yml"]).into_config();
        assert_eq!(
            config.files,
            vec![PathBuf::from("a.csv"), PathBuf::from("b.tsv")]
        );
        assert_eq!(config.state_path, Some(PathBuf::from("work.yml")));
    }

    #[test]
    fn test_no_restore() {
        let config = CliArgs::parse_from(["cellchain", "--no-restore"]).into_config();
        assert!(!config.restore);
    }

    #[test]
    fn test_select_parses_cell_reference() {
        let config = CliArgs::parse_from(["cellchain", "--select", "c12"]).into_config();
        assert_eq!(config.select, Some(CellPosition::new(2, 11)));
    }

    #[test]
    fn test_select_rejects_bad_reference() {
        assert!(CliArgs::try_parse_from(["cellchain", "--select", "12"]).is_err());
        assert!(CliArgs::try_parse_from(["cellchain", "--select", "B0"]).is_err());
    }
}
