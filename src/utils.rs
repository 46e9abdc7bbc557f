//! Small filesystem helpers.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::instrument;

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then probes it with a throwaway file.
/// Called before any fetching starts so a bad output path fails the run
/// early instead of after the crawl.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe = path.join(".write_probe");
    fs::write(&probe, b"").await?;
    fs::remove_file(&probe).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_probe_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        ensure_writable_dir(dir.path()).await.unwrap();
        assert!(!dir.path().join(".write_probe").exists());
    }
}
