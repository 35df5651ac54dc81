//! Archive extraction collaborator.

use std::fs::File;
use std::path::Path;

use bzip2::read::BzDecoder;
use tar::Archive;

use crate::errors::ArchiveError;

/// Extracts a downloaded corpus archive into a destination directory.
pub trait ArchiveSource {
    fn decompress(&self, archive: &Path, destination: &Path) -> Result<(), ArchiveError>;
}

/// Extracts `tar.bz2` archives, the format Tatoeba distributes its
/// sentence and link dumps in.
#[derive(Debug, Default, Clone, Copy)]
pub struct TarBz2Source;

impl ArchiveSource for TarBz2Source {
    fn decompress(&self, archive: &Path, destination: &Path) -> Result<(), ArchiveError> {
        if !archive.is_file() {
            return Err(ArchiveError::NotFound {
                path: archive.to_path_buf(),
            });
        }
        let file = File::open(archive).map_err(|source| ArchiveError::Extraction {
            archive: archive.to_path_buf(),
            destination: destination.to_path_buf(),
            source,
        })?;
        let decoder = BzDecoder::new(file);
        let mut tar = Archive::new(decoder);
        tar.unpack(destination)
            .map_err(|source| ArchiveError::Extraction {
                archive: archive.to_path_buf(),
                destination: destination.to_path_buf(),
                source,
            })
    }
}
