//! Access to the streams of a `.vpx` table.
//!
//! A table is an OLE compound document. Reading it is delegated to the `cfb`
//! crate; this module only adapts it to the small [`Container`] contract the
//! scanner needs and classifies stream keys.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Component, Path};

use crate::error::ScanError;

/// Read-only view of a compound document, as consumed by the scanner.
///
/// Dropping the value releases the underlying handle.
pub trait Container {
    /// Keys of all streams, in the container's enumeration order.
    fn list_streams(&self) -> Vec<String>;

    /// Copies the full content of one stream out of the container.
    fn read_stream(&mut self, key: &str) -> Result<Vec<u8>, ScanError>;
}

/// [`Container`] backed by `cfb::CompoundFile`.
pub struct CfbContainer<F> {
    inner: cfb::CompoundFile<F>,
}

impl CfbContainer<File> {
    /// Opens the compound document at `path`.
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        if !path.exists() {
            return Err(ScanError::NotFound(path.to_path_buf()));
        }
        let inner = cfb::open(path).map_err(|source| ScanError::ContainerOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { inner })
    }
}

impl<F: Read + Seek> CfbContainer<F> {
    /// Wraps an already opened reader, e.g. an in-memory `Cursor`.
    pub fn from_reader(reader: F) -> std::io::Result<Self> {
        Ok(Self {
            inner: cfb::CompoundFile::open(reader)?,
        })
    }
}

impl<F: Read + Seek> Container for CfbContainer<F> {
    fn list_streams(&self) -> Vec<String> {
        self.inner
            .walk()
            .filter(|entry| entry.is_stream())
            .map(|entry| stream_key(entry.path()))
            .collect()
    }

    fn read_stream(&mut self, key: &str) -> Result<Vec<u8>, ScanError> {
        let to_err = |source: std::io::Error| ScanError::StreamRead {
            key: key.to_string(),
            source,
        };
        let mut stream = self.inner.open_stream(format!("/{key}")).map_err(to_err)?;
        let mut data = Vec::new();
        stream.read_to_end(&mut data).map_err(to_err)?;
        Ok(data)
    }
}

/// Turns a CFB entry path (`/GameStg/Image0`) into a stream key (`GameStg/Image0`).
pub fn stream_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// What a stream contributes to the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamClass {
    Image,
    Sound,
    /// Table script and game items; searched for asset references.
    Reference,
    Other,
}

impl StreamClass {
    pub fn of(key: &str) -> Self {
        if key.starts_with("GameStg/Image") {
            StreamClass::Image
        } else if key.starts_with("GameStg/Sound") {
            StreamClass::Sound
        } else if key.starts_with("GameStg/GameItem") || key == "GameStg/GameData" {
            StreamClass::Reference
        } else {
            StreamClass::Other
        }
    }
}
