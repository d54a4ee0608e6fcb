//! Source documents: raw text plus a logical title, read once.

use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    text: String,
}

impl Document {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Read the whole source. Invalid UTF-8 surfaces as an IO error.
    pub fn from_reader<R: Read>(title: impl Into<String>, mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Self::new(title, text))
    }

    /// Load a text file, titling it after the file stem ("my_novella.txt" -> "my novella").
    pub fn from_path(path: &Path) -> Result<Self> {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().replace('_', " "))
            .unwrap_or_else(|| "Untitled".to_string());
        let file = File::open(path)?;
        Self::from_reader(title, BufReader::new(file))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    #[test]
    fn test_from_reader() {
        let doc = Document::from_reader("Tale", Cursor::new("Once upon a time.")).unwrap();
        assert_eq!(doc.title(), "Tale");
        assert_eq!(doc.text(), "Once upon a time.");
    }

    #[test]
    fn test_from_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[0x66, 0x6f, 0xff, 0xfe];
        assert!(Document::from_reader("Bad", Cursor::new(bytes)).is_err());
    }

    #[test]
    fn test_from_path_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("the_lost_city.txt");
        let mut file = File::create(&path).unwrap();
        write!(file, "Chapter 1\nIt began.").unwrap();

        let doc = Document::from_path(&path).unwrap();
        assert_eq!(doc.title(), "the lost city");
        assert_eq!(doc.text(), "Chapter 1\nIt began.");
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(Document::from_path(Path::new("/nonexistent/novella.txt")).is_err());
    }
}
