use crate::sample::Sample;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Serialize samples as a JSON array pretty-printed with 4-space indentation.
pub fn to_pretty_json(samples: &[Sample]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    samples
        .serialize(&mut ser)
        .context("Failed to serialize coordinate log")?;
    Ok(buf)
}

/// Read a previously exported log back from disk.
pub fn load_log(path: &Path) -> Result<Vec<Sample>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read coordinate log: {:?}", path))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse coordinate log: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_json_layout() {
        let samples = vec![
            Sample::new("121.05", "14.65"),
            Sample::new("121.06", "14.66"),
        ];
        let json = String::from_utf8(to_pretty_json(&samples).unwrap()).unwrap();

        let expected = r#"[
    {
        "lon": "121.05",
        "lat": "14.65"
    },
    {
        "lon": "121.06",
        "lat": "14.66"
    }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_load_log_reads_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.json");
        let samples = vec![
            Sample::new("121.05", "14.65"),
            Sample::new("121.06", "14.66"),
            Sample::new("121.07", "14.67"),
        ];
        std::fs::write(&path, to_pretty_json(&samples).unwrap()).unwrap();

        assert_eq!(load_log(&path).unwrap(), samples);
    }

    #[test]
    fn test_load_log_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(load_log(&path).is_err());
        assert!(load_log(&dir.path().join("missing.json")).is_err());
    }
}
