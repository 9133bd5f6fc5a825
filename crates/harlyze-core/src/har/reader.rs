use crate::Result;
use crate::parser::HarParser;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<HarParser> {
        let parser = HarParser::new(Self::read_value(path)?)?;

        tracing::info!(
            "Successfully parsed HAR file with {} entries",
            parser.entry_count()?
        );

        Ok(parser)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<HarParser> {
        tracing::debug!("Parsing HAR from string");

        let parser = HarParser::new(serde_json::from_str(content)?)?;

        tracing::info!(
            "Successfully parsed HAR from string with {} entries",
            parser.entry_count()?
        );

        Ok(parser)
    }

    /// Decode a HAR file without interpreting it
    pub fn read_value(path: &Path) -> Result<Value> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Decode several HAR files, in order, for multi-run aggregation
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Value>> {
        let documents = paths
            .iter()
            .map(|path| Self::read_value(path.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Read {} HAR files", documents.len());
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"{
        "log": {
            "version": "1.2",
            "creator": {"name": "test", "version": "1.0"},
            "entries": []
        }
    }"#;

    fn har_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_minimal_har() {
        let parser = HarReader::from_str(MINIMAL).unwrap();
        assert_eq!(parser.version().unwrap(), "1.2");
        assert_eq!(parser.entry_count().unwrap(), 0);
        assert!(parser.pages().unwrap().is_empty());
    }

    #[test]
    fn test_from_file() {
        let file = har_file(MINIMAL);
        let parser = HarReader::from_file(file.path()).unwrap();
        assert_eq!(parser.creator().unwrap().name, "test");
    }

    #[test]
    fn test_from_files_keeps_order() {
        let first = har_file(MINIMAL);
        let second = har_file(&MINIMAL.replace("1.2", "1.1"));
        let documents = HarReader::from_files(&[first.path(), second.path()]).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["log"]["version"], "1.2");
        assert_eq!(documents[1]["log"]["version"], "1.1");
    }

    #[test]
    fn test_malformed_json() {
        let file = har_file("{\"log\": ");
        assert!(matches!(
            HarReader::from_file(file.path()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = HarReader::from_file(Path::new("/nonexistent/capture.har"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_not_a_har_document() {
        assert!(matches!(
            HarReader::from_str("[]"),
            Err(Error::InvalidInput(_))
        ));
    }
}
