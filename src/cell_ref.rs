//! Spreadsheet-style cell references
//!
//! Converts between zero-based `(col, row)` pairs and `"A1"`-style strings.
//! Panels store cells keyed by [`CellPosition`]; the string form only
//! appears at the edges (CSV files, labels in the UI).

use std::fmt;

/// Position of a cell in a panel grid (zero-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub col: usize,
    pub row: usize,
}

impl CellPosition {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// True if this position lies inside a `cols` x `rows` grid
    #[inline]
    pub fn is_within(&self, cols: usize, rows: usize) -> bool {
        self.col < cols && self.row < rows
    }

    /// The `"A1"`-style reference for this position
    pub fn to_ref(self) -> String {
        cell_ref(self.col, self.row)
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_letters(self.col), self.row + 1)
    }
}

/// Error returned when a cell reference string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRefError {
    Empty,
    MissingColumn(String),
    MissingRow(String),
    InvalidColumnChar(char),
    InvalidRow(String),
}

impl fmt::Display for CellRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellRefError::Empty => write!(f, "empty cell reference"),
            CellRefError::MissingColumn(s) => write!(f, "missing column letters in ref: {}", s),
            CellRefError::MissingRow(s) => write!(f, "missing row digits in ref: {}", s),
            CellRefError::InvalidColumnChar(c) => write!(f, "invalid column char: {}", c),
            CellRefError::InvalidRow(s) => write!(f, "invalid row number: {}", s),
        }
    }
}

impl std::error::Error for CellRefError {}

/// Convert a zero-based column index to letters: 0 -> "A", 25 -> "Z", 26 -> "AA"
pub fn col_to_letters(col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    // Only ASCII uppercase bytes were pushed
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert column letters (case-insensitive) to a zero-based index
pub fn letters_to_col(letters: &str) -> Result<usize, CellRefError> {
    let letters = letters.trim();
    if letters.is_empty() {
        return Err(CellRefError::MissingColumn(String::new()));
    }

    let mut result: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(CellRefError::InvalidColumnChar(ch));
        }
        let value = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        result = result * 26 + value;
    }
    Ok(result - 1)
}

/// Format a zero-based `(col, row)` as an `"A1"`-style reference
pub fn cell_ref(col: usize, row: usize) -> String {
    format!("{}{}", col_to_letters(col), row + 1)
}

/// Parse an `"A1"`-style reference (e.g. `"BC23"`, `"c3"`) into a position
pub fn parse_cell_ref(reference: &str) -> Result<CellPosition, CellRefError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(CellRefError::Empty);
    }

    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    if split == 0 {
        return Err(CellRefError::MissingColumn(reference.to_string()));
    }

    let (letters, digits) = reference.split_at(split);
    let digits = digits.trim();
    if digits.is_empty() {
        return Err(CellRefError::MissingRow(reference.to_string()));
    }

    let col = letters_to_col(letters)?;
    let row: usize = digits
        .parse()
        .map_err(|_| CellRefError::InvalidRow(digits.to_string()))?;
    if row == 0 {
        return Err(CellRefError::InvalidRow(digits.to_string()));
    }

    Ok(CellPosition::new(col, row - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letters() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(27), "AB");
        assert_eq!(col_to_letters(701), "ZZ");
        assert_eq!(col_to_letters(702), "AAA");
    }

    #[test]
    fn test_letters_to_col() {
        assert_eq!(letters_to_col("A"), Ok(0));
        assert_eq!(letters_to_col("z"), Ok(25));
        assert_eq!(letters_to_col("AA"), Ok(26));
        assert_eq!(letters_to_col("ZZ"), Ok(701));
        assert_eq!(letters_to_col("A1"), Err(CellRefError::InvalidColumnChar('1')));
    }

    #[test]
    fn test_cell_ref_formatting() {
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref(2, 2), "C3");
        assert_eq!(CellPosition::new(54, 22).to_ref(), "BC23");
        assert_eq!(CellPosition::new(1, 9).to_string(), "B10");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Ok(CellPosition::new(0, 0)));
        assert_eq!(parse_cell_ref("c3"), Ok(CellPosition::new(2, 2)));
        assert_eq!(parse_cell_ref(" BC23 "), Ok(CellPosition::new(54, 22)));
    }

    #[test]
    fn test_parse_cell_ref_errors() {
        assert_eq!(parse_cell_ref(""), Err(CellRefError::Empty));
        assert!(matches!(
            parse_cell_ref("12"),
            Err(CellRefError::MissingColumn(_))
        ));
        assert!(matches!(parse_cell_ref("AB"), Err(CellRefError::MissingRow(_))));
        assert!(matches!(parse_cell_ref("A0"), Err(CellRefError::InvalidRow(_))));
        assert!(matches!(parse_cell_ref("A1x"), Err(CellRefError::InvalidRow(_))));
    }

    #[test]
    fn test_round_trip_through_string_form() {
        for &(col, row) in &[(0, 0), (25, 4), (26, 99), (701, 0)] {
            let pos = CellPosition::new(col, row);
            assert_eq!(parse_cell_ref(&pos.to_ref()), Ok(pos));
        }
    }

    #[test]
    fn test_is_within() {
        let pos = CellPosition::new(2, 2);
        assert!(pos.is_within(3, 3));
        assert!(!pos.is_within(2, 5));
        assert!(!pos.is_within(5, 2));
    }
}
