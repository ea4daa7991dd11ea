// JSON checkpoint files written between pipeline stages.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::AppError;

pub const RAW_EMPLOYERS: &str = "employers.json";
pub const RAW_VACANCIES: &str = "vacancies.json";
pub const EMPLOYERS_DATA: &str = "employers_data.json";
pub const VACANCIES_DATA: &str = "vacancies_data.json";

/// The four checkpoint files of a run, rooted at one data directory.
#[derive(Debug, Clone)]
pub struct Checkpoints {
    dir: PathBuf,
}

impl Checkpoints {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn raw_employers(&self) -> PathBuf {
        self.dir.join(RAW_EMPLOYERS)
    }

    pub fn raw_vacancies(&self) -> PathBuf {
        self.dir.join(RAW_VACANCIES)
    }

    pub fn employers_data(&self) -> PathBuf {
        self.dir.join(EMPLOYERS_DATA)
    }

    pub fn vacancies_data(&self) -> PathBuf {
        self.dir.join(VACANCIES_DATA)
    }
}

/// Write `records` as a pretty JSON array at `path`, replacing any existing file.
///
/// Output is UTF-8 with two-space indentation; non-ASCII text is written as is.
pub fn save<T: Serialize>(records: &[T], path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| AppError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    records
        .serialize(&mut ser)
        .map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    fs::write(path, buf).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("\"{}\" saved ({} records)", path.display(), records.len());
    Ok(())
}

/// Read back a JSON array written by [`save`].
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let bytes = fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}
