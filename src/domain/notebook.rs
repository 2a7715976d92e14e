use crate::adapters::storage::LocalStorage;
use crate::domain::model::Cell;
use crate::domain::ports::Storage;
use crate::utils::error::{NotebookError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

pub const NOTEBOOK_EXTENSION: &str = "ipynb";
pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 5;

/// Serialized shape of a notebook file.
#[derive(Debug, Serialize)]
pub struct NotebookDocument<'a> {
    pub cells: Vec<Map<String, Value>>,
    pub metadata: &'a Map<String, Value>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    path: PathBuf,
    cells: Vec<Cell>,
    metadata: Map<String, Value>,
}

impl Notebook {
    /// In-memory notebook. `.ipynb` is appended to `path` when missing.
    pub fn new(path: impl AsRef<Path>, cells: Vec<Cell>, metadata: Map<String, Value>) -> Self {
        Self {
            path: with_notebook_extension(path.as_ref()),
            cells,
            metadata,
        }
    }

    pub fn with_cells(path: impl AsRef<Path>, cells: Vec<Cell>) -> Self {
        Self::new(path, cells, Map::new())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(&LocalStorage::default(), path)
    }

    pub fn load_with<S: Storage>(storage: &S, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !storage.is_file(path) {
            return Err(NotebookError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        if !has_notebook_extension(path) {
            return Err(NotebookError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!("Loading notebook from {}", path.display());
        let bytes = storage.read_file(path)?;
        let notebook = Self::from_slice(path, &bytes)?;
        tracing::debug!("Loaded {}", notebook);
        Ok(notebook)
    }

    /// Parses notebook JSON. Only `cells` and `metadata` are read; the
    /// format version fields are fixed by this crate.
    pub fn from_slice(path: impl AsRef<Path>, bytes: &[u8]) -> Result<Self> {
        let document: Value = serde_json::from_slice(bytes)?;
        let object = document
            .as_object()
            .ok_or_else(|| NotebookError::format("top level is not a JSON object"))?;

        let cells = object
            .get("cells")
            .ok_or_else(|| NotebookError::format("missing top-level 'cells' array"))?
            .as_array()
            .ok_or_else(|| NotebookError::format("'cells' is not an array"))?
            .iter()
            .enumerate()
            .map(|(index, value)| Cell::from_mapping(value, index))
            .collect::<Result<Vec<_>>>()?;

        let metadata = match object.get("metadata") {
            None => Map::new(),
            Some(Value::Object(metadata)) => metadata.clone(),
            Some(_) => return Err(NotebookError::format("'metadata' is not an object")),
        };

        Ok(Self::new(path, cells, metadata))
    }

    /// New notebook holding `self`'s cells followed by `other`'s. Metadata
    /// comes from `self` only.
    pub fn append(&self, other: &Notebook, new_path: Option<&Path>) -> Notebook {
        let mut cells = Vec::with_capacity(self.cells.len() + other.cells.len());
        cells.extend(self.cells.iter().cloned());
        cells.extend(other.cells.iter().cloned());
        Notebook::new(new_path.unwrap_or(self.path.as_path()), cells, self.metadata.clone())
    }

    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.save_with(&LocalStorage::default(), path)
    }

    /// Writes the notebook to `path`, or to its own path when `None`.
    /// The notebook's stored path is left as is.
    pub fn save_with<S: Storage>(&self, storage: &S, path: Option<&Path>) -> Result<PathBuf> {
        let target = path.unwrap_or(self.path.as_path());
        let contents = self.to_json_string()?;
        storage.write_file(target, contents.as_bytes())?;
        tracing::debug!("Saved {} to {}", self, target.display());
        Ok(target.to_path_buf())
    }

    pub fn to_document(&self) -> NotebookDocument<'_> {
        NotebookDocument {
            cells: self.cells.iter().map(Cell::to_mapping).collect(),
            metadata: &self.metadata,
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }

    /// Jupyter's on-disk layout: one-space indent, trailing newline.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.to_document().serialize(&mut serializer)?;
        buffer.push(b'\n');
        String::from_utf8(buffer).map_err(|e| NotebookError::format(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Notebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notebook(path={}, ncells={})",
            self.path.display(),
            self.cells.len()
        )
    }
}

pub fn has_notebook_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(NOTEBOOK_EXTENSION)
}

/// `path` with `.ipynb` appended unless it already ends in it.
pub fn with_notebook_extension(path: &Path) -> PathBuf {
    if has_notebook_extension(path) {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(NOTEBOOK_EXTENSION);
    PathBuf::from(raw)
}
