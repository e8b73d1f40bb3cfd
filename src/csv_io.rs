//! CSV reading and writing for panel contents
//!
//! RFC 4180 parsing via the csv crate. Files never carry a header row; every
//! record becomes a grid row and ragged rows are padded with empty cells.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::model::panel::{Panel, PanelContent};

/// Field delimiter, chosen from the file extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }

    /// Detect delimiter from a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "tsv" => Delimiter::Tab,
            "psv" => Delimiter::Pipe,
            _ => Delimiter::Comma,
        }
    }

    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }
}

/// Error reading or writing a panel's backing file
#[derive(Debug)]
pub enum PanelIoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        path: PathBuf,
        message: String,
        line: Option<usize>,
    },
}

impl PanelIoError {
    pub fn path(&self) -> &Path {
        match self {
            PanelIoError::Io { path, .. } | PanelIoError::Csv { path, .. } => path,
        }
    }
}

impl fmt::Display for PanelIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelIoError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            PanelIoError::Csv {
                path,
                message,
                line: Some(line),
            } => write!(f, "{}: CSV error at line {}: {}", path.display(), line, message),
            PanelIoError::Csv {
                path,
                message,
                line: None,
            } => write!(f, "{}: CSV error: {}", path.display(), message),
        }
    }
}

impl std::error::Error for PanelIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PanelIoError::Io { source, .. } => Some(source),
            PanelIoError::Csv { .. } => None,
        }
    }
}

/// Parse CSV text into detached panel content.
///
/// Returns the message and 1-based record number on failure.
pub fn parse_panel_csv(
    content: &str,
    delimiter: Delimiter,
) -> Result<PanelContent, (String, Option<usize>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(content.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result.map_err(|e| (e.to_string(), Some(line_num + 1)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(PanelContent::from_rows(rows))
}

/// Read and parse the CSV file at `path`
pub fn read_panel_csv(path: &Path) -> Result<PanelContent, PanelIoError> {
    let text = fs::read_to_string(path).map_err(|source| PanelIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_panel_csv(&text, Delimiter::for_path(path)).map_err(|(message, line)| {
        PanelIoError::Csv {
            path: path.to_path_buf(),
            message,
            line,
        }
    })
}

/// Serialize a panel's grid to CSV text.
///
/// Every row has `cols` fields. Trailing rows with no content are dropped, so
/// an empty panel produces an empty string.
pub fn panel_to_csv(panel: &Panel, delimiter: Delimiter) -> Result<String, String> {
    let row_count = panel.last_used_row().map_or(0, |row| row + 1);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(false)
        .from_writer(Vec::new());

    for row in 0..row_count {
        let record: Vec<&str> = (0..panel.cols()).map(|col| panel.get_cell(col, row)).collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Write a panel to `path`, creating parent directories as needed
pub fn write_panel_csv(path: &Path, panel: &Panel) -> Result<(), PanelIoError> {
    let io_err = |source| PanelIoError::Io {
        path: path.to_path_buf(),
        source,
    };

    let text = panel_to_csv(panel, Delimiter::for_path(path)).map_err(|message| {
        PanelIoError::Csv {
            path: path.to_path_buf(),
            message,
            line: None,
        }
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)?;

    tracing::debug!(path = %path.display(), "wrote panel csv");
    Ok(())
}

/// Final path component, used as the panel's recorded file name
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = parse_panel_csv("a,b,c\n1,2,3\n", Delimiter::Comma).unwrap();
        assert_eq!((content.cols, content.rows), (3, 2));
        assert_eq!(content.cells.len(), 6);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let content = parse_panel_csv(
            "\"hello, world\",\"with \"\"quotes\"\"\"\n",
            Delimiter::Comma,
        )
        .unwrap();

        let mut panel = Panel::new_blank(0, 0, 1, 1);
        panel.replace_content(content);
        assert_eq!(panel.get_cell(0, 0), "hello, world");
        assert_eq!(panel.get_cell(1, 0), "with \"quotes\"");
    }

    #[test]
    fn test_parse_ragged_rows_pads() {
        let content = parse_panel_csv("a,b,c\n1\n", Delimiter::Comma).unwrap();
        assert_eq!((content.cols, content.rows), (3, 2));
    }

    #[test]
    fn test_parse_empty_is_one_by_one() {
        let content = parse_panel_csv("", Delimiter::Comma).unwrap();
        assert_eq!((content.cols, content.rows), (1, 1));
        assert!(content.cells.is_empty());
    }

    #[test]
    fn test_parse_tsv() {
        let content = parse_panel_csv("a\tb\n", Delimiter::Tab).unwrap();
        assert_eq!(content.cols, 2);
    }

    #[test]
    fn test_delimiter_from_extension() {
        assert_eq!(Delimiter::from_extension("tsv"), Delimiter::Tab);
        assert_eq!(Delimiter::from_extension("TSV"), Delimiter::Tab);
        assert_eq!(Delimiter::from_extension("psv"), Delimiter::Pipe);
        assert_eq!(Delimiter::from_extension("csv"), Delimiter::Comma);
        assert_eq!(Delimiter::for_path(Path::new("no_extension")), Delimiter::Comma);
    }

    #[test]
    fn test_panel_to_csv_trims_trailing_empty_rows() {
        let mut panel = Panel::new_blank(0, 0, 3, 6);
        panel.set_cell(0, 0, "a");
        panel.set_cell(2, 1, "b");
        let text = panel_to_csv(&panel, Delimiter::Comma).unwrap();
        assert_eq!(text, "a,,\n,,b\n");
    }

    #[test]
    fn test_panel_to_csv_quotes_when_needed() {
        let mut panel = Panel::new_blank(0, 0, 2, 1);
        panel.set_cell(0, 0, "x,y");
        let text = panel_to_csv(&panel, Delimiter::Comma).unwrap();
        assert_eq!(text, "\"x,y\",\n");
    }

    #[test]
    fn test_empty_panel_writes_nothing() {
        let panel = Panel::new_blank(0, 0, 4, 4);
        assert_eq!(panel_to_csv(&panel, Delimiter::Comma).unwrap(), "");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let err = read_panel_csv(&path).unwrap_err();
        assert!(matches!(err, PanelIoError::Io { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sheet.tsv");

        let mut panel = Panel::new_blank(0, 0, 2, 2);
        panel.set_cell(1, 1, "tab\tinside");
        write_panel_csv(&path, &panel).unwrap();

        let content = read_panel_csv(&path).unwrap();
        let mut loaded = Panel::new_blank(0, 0, 1, 1);
        loaded.replace_content(content);
        assert_eq!((loaded.cols(), loaded.rows()), (2, 2));
        assert_eq!(loaded.get_cell(1, 1), "tab\tinside");
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of(Path::new("/tmp/data/sales.csv")), "sales.csv");
        assert_eq!(file_name_of(Path::new("plain.csv")), "plain.csv");
    }
}
