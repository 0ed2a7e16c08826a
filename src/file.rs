use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use audec::auto_decompress;
use log::debug;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::container::{Directory, LookupError, ParseError};
use crate::traits::Container;

const ROOT_MAGIC_BYTES: [u8; 4] = [b'r', b'o', b'o', b't'];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {0:?}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("{0:?} is a binary ROOT file. Export it to YAML first")]
    RootUnsupported(PathBuf),
    #[error("{0:?} is not valid YAML")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
    #[error("Invalid container in {0:?}")]
    Structure(PathBuf, #[source] ParseError),
    #[error("Failed to find folder `{folder}` in {path:?}")]
    Folder {
        path: PathBuf,
        folder: String,
        #[source]
        source: LookupError,
    },
}

/// Open the container in the file at `path`
///
/// Compressed files are decompressed transparently. If `folder` is not
/// empty, the sub-directory with this path is returned instead of the
/// top level.
pub fn open<P: AsRef<Path>>(path: P, folder: &str) -> Result<Directory, LoadError> {
    let path = path.as_ref();
    let io_err = |err| LoadError::Io(path.to_owned(), err);
    let file = File::open(path).map_err(io_err)?;
    let mut r = BufReader::new(file);
    if r.fill_buf().map_err(io_err)?.starts_with(&ROOT_MAGIC_BYTES) {
        return Err(LoadError::RootUnsupported(path.to_owned()));
    }
    let dir = read(auto_decompress(r)).map_err(|err| match err {
        ReadError::Yaml(err) => LoadError::Yaml(path.to_owned(), err),
        ReadError::Structure(err) => LoadError::Structure(path.to_owned(), err),
    })?;
    debug!("Read {} top-level entries from {path:?}", dir.len());
    if folder.split('/').all(str::is_empty) {
        return Ok(dir);
    }
    match dir.get_directory(folder) {
        Ok(sub) => Ok(sub.clone()),
        Err(source) => Err(LoadError::Folder {
            path: path.to_owned(),
            folder: folder.to_owned(),
            source,
        }),
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to parse YAML")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid container structure")]
    Structure(#[from] ParseError),
}

/// Read a container from uncompressed YAML
pub fn read<R: Read>(reader: R) -> Result<Directory, ReadError> {
    let mapping = match serde_yaml::from_reader(reader)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(ParseError::NotAMapping(String::new()).into()),
    };
    Ok(Directory::from_mapping(mapping)?)
}
