use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Trait for handing an exported log to whatever stores it
///
/// Implementations receive the complete serialized bytes and the final file
/// name (`<base>.json`), and return where the file ended up.
#[async_trait]
pub trait FileSaver: Send {
    async fn save(&mut self, contents: Vec<u8>, file_name: &str) -> Result<PathBuf>;
}

/// Keeps every save in memory so tests can inspect it.
#[cfg(test)]
#[derive(Default)]
pub struct MemorySaver {
    pub saved: Vec<(String, Vec<u8>)>,
}

#[cfg(test)]
#[async_trait]
impl FileSaver for MemorySaver {
    async fn save(&mut self, contents: Vec<u8>, file_name: &str) -> Result<PathBuf> {
        self.saved.push((file_name.to_string(), contents));
        Ok(PathBuf::from(file_name))
    }
}
