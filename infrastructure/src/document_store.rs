use domain::errors::{RagError, RagResult};
use domain::models::Document;
use memmap2::Mmap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Directory where uploads are written before extraction.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl AsRef<Path>) -> RagResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            RagError::Ingestion(format!("cannot create {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the upload under its file name. Directory parts of the name are
    /// dropped so an upload cannot escape the store.
    pub fn save(&self, document: &Document) -> RagResult<PathBuf> {
        let name = Path::new(&document.filename)
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                RagError::Ingestion(format!("invalid file name: {:?}", document.filename))
            })?;
        let path = self.root.join(name);
        fs::write(&path, &document.bytes)
            .map_err(|e| RagError::Ingestion(format!("cannot write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    /// Map a stored upload read-only.
    pub fn open(&self, path: &Path) -> RagResult<Mmap> {
        let file = File::open(path)
            .map_err(|e| RagError::Ingestion(format!("cannot open {}: {}", path.display(), e)))?;
        let len = file.metadata().map_err(RagError::ingestion)?.len();
        if len == 0 {
            return Err(RagError::Ingestion(format!(
                "{} is empty",
                path.display()
            )));
        }
        // The store only ever rewrites a file through `save`, which the
        // single-interaction session never runs while a map is alive.
        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|e| RagError::Ingestion(format!("cannot map {}: {}", path.display(), e)))?;
        Ok(mmap)
    }
}
