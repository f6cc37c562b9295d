//! Verification pair list files.
//!
//! Whitespace-separated lines of `label path_a path_b`, label `1` for
//! genuine and `0` for impostor. Fields past the third are ignored; blank
//! lines are skipped silently; otherwise-malformed lines are skipped and
//! counted so a mostly-broken input is visible in the report.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use verimetric_core::VerifyResult;

/// One parsed pair entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairEntry {
    /// Ground truth for the pair.
    pub genuine: bool,
    /// Sample file for the first side.
    pub path_a: PathBuf,
    /// Sample file for the second side.
    pub path_b: PathBuf,
}

/// A parsed pair list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairFile {
    /// Entries in file order.
    pub entries: Vec<PairEntry>,
    /// Non-blank lines that failed to parse.
    pub skipped_lines: usize,
}

impl PairFile {
    /// Parse pair list text.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut skipped_lines = 0usize;
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                warn!(line = lineno + 1, "pair line has fewer than 3 fields");
                skipped_lines += 1;
                continue;
            }
            let genuine = match fields[0] {
                "1" => true,
                "0" => false,
                other => {
                    warn!(line = lineno + 1, label = other, "unrecognized pair label");
                    skipped_lines += 1;
                    continue;
                }
            };
            entries.push(PairEntry {
                genuine,
                path_a: PathBuf::from(fields[1]),
                path_b: PathBuf::from(fields[2]),
            });
        }
        Self {
            entries,
            skipped_lines,
        }
    }

    /// Read and parse a pair list file.
    pub fn load(path: &Path) -> VerifyResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Genuine entry count.
    pub fn genuine_count(&self) -> usize {
        self.entries.iter().filter(|e| e.genuine).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_well_formed() {
        let f = PairFile::parse("1 a/x.wav a/y.wav\n0 a/x.wav b/z.wav\n");
        assert_eq!(f.len(), 2);
        assert_eq!(f.skipped_lines, 0);
        assert!(f.entries[0].genuine);
        assert!(!f.entries[1].genuine);
        assert_eq!(f.entries[1].path_b, PathBuf::from("b/z.wav"));
        assert_eq!(f.genuine_count(), 1);
    }

    #[test]
    fn test_blank_lines_skipped_silently() {
        let f = PairFile::parse("\n1 a b\n\n\n0 c d\n");
        assert_eq!(f.len(), 2);
        assert_eq!(f.skipped_lines, 0);
    }

    #[test]
    fn test_short_lines_counted() {
        let f = PairFile::parse("1 a\nnonsense\n1 a b\n");
        assert_eq!(f.len(), 1);
        assert_eq!(f.skipped_lines, 2);
    }

    #[test]
    fn test_bad_label_counted() {
        let f = PairFile::parse("2 a b\ngenuine a b\n0 a b\n");
        assert_eq!(f.len(), 1);
        assert_eq!(f.skipped_lines, 2);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let f = PairFile::parse("1 a b extra trailing fields\n");
        assert_eq!(f.len(), 1);
        assert_eq!(f.entries[0].path_a, PathBuf::from("a"));
        assert_eq!(f.entries[0].path_b, PathBuf::from("b"));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1 x y").unwrap();
        writeln!(file, "0 x z").unwrap();

        let f = PairFile::load(file.path()).unwrap();
        assert_eq!(f.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = PairFile::load(Path::new("/nonexistent/pairs.txt")).unwrap_err();
        assert!(matches!(err, verimetric_core::VerifyError::Io(_)));
    }
}
