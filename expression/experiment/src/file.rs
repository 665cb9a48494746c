use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error. path: {path}, cause: {cause}")]
    Io { path: PathBuf, cause: std::io::Error },
    #[error("JSON error. path: {path}, cause: {cause}")]
    Json { path: PathBuf, cause: serde_json::Error },
}

pub fn load<T: DeserializeOwned>(file_path: &Path) -> Result<T, FileError> {
    let file = File::open(file_path).map_err(|cause| FileError::Io {
        path: file_path.to_path_buf(),
        cause,
    })?;
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(file));
    let t = T::deserialize(&mut de).map_err(|cause| FileError::Json {
        path: file_path.to_path_buf(),
        cause,
    })?;
    Ok(t)
}

/// Writes `t` as pretty JSON, four-space indented, with a trailing newline.
pub fn save<T: Serialize>(t: &T, file_path: &Path) -> Result<(), FileError> {
    let io_error = |cause| FileError::Io {
        path: file_path.to_path_buf(),
        cause,
    };

    let file = File::create(file_path).map_err(io_error)?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(file, formatter);
    t.serialize(&mut ser)
        .map_err(|cause| FileError::Json {
            path: file_path.to_path_buf(),
            cause,
        })?;

    let mut file = ser.into_inner();
    file.write_all(b"\n").map_err(io_error)?;

    Ok(())
}
