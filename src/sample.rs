use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Where the paragraph lives unless the config or CLI says otherwise
pub const DEFAULT_SAMPLE_PATH: &str = "resources/sample_paragraph.txt";

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sample file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read sample file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SampleError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => SampleError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SampleError::Read {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Read the sample paragraph, joining lines with no separator.
///
/// Line breaks in the file are dropped, so "one\ntwo" becomes "onetwo".
pub fn read_sample_paragraph<P: AsRef<Path>>(path: P) -> Result<String, SampleError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SampleError::from_io(path, e))?;

    let mut paragraph = String::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| SampleError::from_io(path, e))?;
        paragraph.push_str(&line);
    }

    debug!(path = %path.display(), chars = paragraph.chars().count(), "sample loaded");
    Ok(paragraph)
}

/// Sample paragraph for display. On failure the error message itself
/// becomes the text to type, so the window still opens.
pub fn sample_paragraph<P: AsRef<Path>>(path: P) -> String {
    match read_sample_paragraph(path) {
        Ok(paragraph) => paragraph,
        Err(e) => {
            warn!(error = %e, "could not load sample text");
            format!("Error: {e}")
        }
    }
}
