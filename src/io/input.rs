use std::path::Path;

use anyhow::{Context, Result};

/// Read a call transcript from a plain-text file.
pub fn read_transcript(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {:?}", path))?;
    if text.trim().is_empty() {
        anyhow::bail!("Transcript file is empty: {:?}", path);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_transcript() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Member: I need help with a claim.").unwrap();
        let text = read_transcript(file.path()).unwrap();
        assert!(text.contains("help with a claim"));
    }

    #[test]
    fn test_read_empty_transcript_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let error = read_transcript(file.path()).unwrap_err();
        assert!(error.to_string().contains("empty"));
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let error = read_transcript(Path::new("/no/such/transcript.txt")).unwrap_err();
        assert!(error.to_string().contains("transcript.txt"));
    }
}
