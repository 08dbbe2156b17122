//! Artifact files: whole-batch JSON in, whole-batch JSON out.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{ProwlError, Result};

/// Read a JSON artifact. Missing, unreadable or unparseable files are `Input` errors.
pub fn read_json(path: &Path) -> Result<Value> {
    let file = fs::File::open(path).map_err(|e| ProwlError::input(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ProwlError::input(path, e))
}

/// Write pretty JSON so readers never observe a partial artifact.
///
/// The document goes to a sibling temp file first and is renamed into place.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let written = (|| -> Result<()> {
        let mut out = BufWriter::new(fs::File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut out, value)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    })();
    match written.and_then(|_| fs::rename(&tmp, path).map_err(ProwlError::from)) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
