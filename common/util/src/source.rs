use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Where an input document comes from.
///
/// `-` on the command line means standard input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    File(PathBuf),
    Stdin,
}

impl FromStr for Source {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(SourceError::Empty),
            "-" => Ok(Source::Stdin),
            _ => Ok(Source::File(PathBuf::from(s))),
        }
    }
}

impl Source {
    /// Resolves `path` against `root` when it is relative, and checks that it names an existing file.
    pub fn try_from_path(root: &Path, path: PathBuf) -> Result<Source, SourceError> {
        let full_path = match path.is_absolute() {
            true => path,
            false => root.join(path),
        };

        if !full_path.exists() {
            return Err(SourceError::PathDoesNotExist(full_path));
        }
        if !full_path.is_file() {
            return Err(SourceError::PathIsNotAFile(full_path));
        }
        Ok(Source::File(full_path))
    }

    pub fn path(&self) -> Result<PathBuf, SourceError> {
        match self {
            Source::File(path) => Ok(path.clone()),
            Source::Stdin => Err(SourceError::NotAPath),
        }
    }

    pub fn open(&self) -> Result<Box<dyn BufRead>, SourceError> {
        match self {
            Source::File(path) => {
                let file = File::open(path).map_err(|cause| SourceError::UnableToOpen {
                    path: path.clone(),
                    cause,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
            Source::Stdin => Ok(Box::new(BufReader::new(std::io::stdin()))),
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(path) => f.write_str(path.display().to_string().as_str()),
            Source::Stdin => f.write_str("<stdin>"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Empty source.")]
    Empty,
    #[error("Path does not exist. path: {0}")]
    PathDoesNotExist(PathBuf),
    #[error("Path is not a file. path: {0}")]
    PathIsNotAFile(PathBuf),
    #[error("Source is not a path.")]
    NotAPath,
    #[error("Unable to open source. path: {path}, cause: {cause}")]
    UnableToOpen { path: PathBuf, cause: std::io::Error },
}
