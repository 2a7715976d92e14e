use crate::utils::error::{NotebookError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Code => "code",
            CellType::Markdown => "markdown",
            CellType::Raw => "raw",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell variant. The execution count lives inside `Code` so that markdown and
/// raw cells cannot carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    Code { execution_count: Option<u64> },
    Markdown,
    Raw,
}

impl CellKind {
    pub fn cell_type(&self) -> CellType {
        match self {
            CellKind::Code { .. } => CellType::Code,
            CellKind::Markdown => CellType::Markdown,
            CellKind::Raw => CellType::Raw,
        }
    }
}

/// One notebook cell. Immutable once built: rewriting the source yields a new
/// `Cell`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    kind: CellKind,
    id: String,
    metadata: Map<String, Value>,
    source: Vec<String>,
}

impl Cell {
    /// Builds a cell from its raw parts.
    ///
    /// `execution_count` is `None` when the field is absent and `Some(None)`
    /// when it is present but null. Code cells require it to be present; it is
    /// ignored for every other cell type.
    pub fn new(
        cell_type: CellType,
        id: impl Into<String>,
        metadata: Map<String, Value>,
        source: Vec<String>,
        execution_count: Option<Option<u64>>,
    ) -> Result<Self> {
        let kind = match cell_type {
            CellType::Code => CellKind::Code {
                execution_count: execution_count.ok_or_else(|| NotebookError::MissingField {
                    field: "execution_count".to_string(),
                    cell_index: None,
                })?,
            },
            CellType::Markdown => CellKind::Markdown,
            CellType::Raw => CellKind::Raw,
        };

        Ok(Self {
            kind,
            id: id.into(),
            metadata,
            source,
        })
    }

    pub fn code(
        id: impl Into<String>,
        metadata: Map<String, Value>,
        source: Vec<String>,
        execution_count: Option<u64>,
    ) -> Self {
        Self {
            kind: CellKind::Code { execution_count },
            id: id.into(),
            metadata,
            source,
        }
    }

    pub fn markdown(id: impl Into<String>, metadata: Map<String, Value>, source: Vec<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            id: id.into(),
            metadata,
            source,
        }
    }

    pub fn raw(id: impl Into<String>, metadata: Map<String, Value>, source: Vec<String>) -> Self {
        Self {
            kind: CellKind::Raw,
            id: id.into(),
            metadata,
            source,
        }
    }

    /// Parses one element of a notebook's `cells` array. `cell_index` is only
    /// used to point error messages at the offending cell.
    pub fn from_mapping(value: &Value, cell_index: usize) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            NotebookError::format(format!("cell {} is not a JSON object", cell_index))
        })?;

        let missing = |field: &str| NotebookError::MissingField {
            field: field.to_string(),
            cell_index: Some(cell_index),
        };

        let cell_type_value = object.get("cell_type").ok_or_else(|| missing("cell_type"))?;
        let cell_type: CellType = serde_json::from_value(cell_type_value.clone()).map_err(|_| {
            NotebookError::format(format!(
                "cell {} has unknown cell_type {}",
                cell_index, cell_type_value
            ))
        })?;

        let id = object
            .get("id")
            .ok_or_else(|| missing("id"))?
            .as_str()
            .ok_or_else(|| NotebookError::format(format!("cell {} id is not a string", cell_index)))?
            .to_string();

        let metadata = object
            .get("metadata")
            .ok_or_else(|| missing("metadata"))?
            .as_object()
            .cloned()
            .ok_or_else(|| {
                NotebookError::format(format!("cell {} metadata is not an object", cell_index))
            })?;

        let source = parse_source(object.get("source").ok_or_else(|| missing("source"))?)
            .ok_or_else(|| {
                NotebookError::format(format!(
                    "cell {} source is neither a string nor a list of strings",
                    cell_index
                ))
            })?;

        let execution_count = match object.get("execution_count") {
            None => None,
            Some(Value::Null) => Some(None),
            Some(count) => Some(Some(count.as_u64().ok_or_else(|| {
                NotebookError::format(format!(
                    "cell {} execution_count is not a non-negative integer",
                    cell_index
                ))
            })?)),
        };

        Self::new(cell_type, id, metadata, source, execution_count).map_err(|err| match err {
            NotebookError::MissingField { field, .. } => NotebookError::MissingField {
                field,
                cell_index: Some(cell_index),
            },
            other => other,
        })
    }

    /// File-format mapping: `cell_type`, `execution_count` (code cells only),
    /// `id`, `metadata`, `source`, in that order.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut mapping = Map::new();
        mapping.insert(
            "cell_type".to_string(),
            Value::String(self.cell_type().as_str().to_string()),
        );
        if let CellKind::Code { execution_count } = self.kind {
            mapping.insert(
                "execution_count".to_string(),
                execution_count.map_or(Value::Null, Value::from),
            );
        }
        mapping.insert("id".to_string(), Value::String(self.id.clone()));
        mapping.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        mapping.insert(
            "source".to_string(),
            Value::Array(self.source.iter().cloned().map(Value::String).collect()),
        );
        mapping
    }

    pub fn cell_type(&self) -> CellType {
        self.kind.cell_type()
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn source(&self) -> &[String] {
        &self.source
    }

    pub fn first_line(&self) -> Option<&str> {
        self.source.first().map(String::as_str)
    }

    pub fn execution_count(&self) -> Option<u64> {
        match self.kind {
            CellKind::Code { execution_count } => execution_count,
            _ => None,
        }
    }

    /// Copy of this cell with `source` swapped in.
    pub fn with_source(&self, source: Vec<String>) -> Self {
        Self {
            kind: self.kind.clone(),
            id: self.id.clone(),
            metadata: self.metadata.clone(),
            source,
        }
    }

    /// Copy of this cell with every occurrence of `from` replaced by `to` on
    /// each source line. Plain substring replacement.
    pub fn replace_in_source(&self, from: &str, to: &str) -> Self {
        self.with_source(self.source.iter().map(|line| line.replace(from, to)).collect())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell(id={}, cell_type={})", self.id, self.cell_type())
    }
}

fn parse_source(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(text) => Some(text.split_inclusive('\n').map(str::to_string).collect()),
        Value::Array(lines) => lines
            .iter()
            .map(|line| line.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_code_cell_requires_execution_count() {
        let result = Cell::new(CellType::Code, "c1", Map::new(), lines(&["x = 1"]), None);
        assert!(matches!(
            result,
            Err(NotebookError::MissingField { ref field, cell_index: None }) if field == "execution_count"
        ));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Cell is missing required field 'execution_count'"
        );

        let cell =
            Cell::new(CellType::Code, "c1", Map::new(), lines(&["x = 1"]), Some(None)).unwrap();
        assert_eq!(cell.execution_count(), None);
        assert_eq!(cell.cell_type(), CellType::Code);
    }

    #[test]
    fn test_non_code_cell_drops_execution_count() {
        let cell = Cell::new(
            CellType::Markdown,
            "m1",
            Map::new(),
            lines(&["# Title"]),
            Some(Some(4)),
        )
        .unwrap();
        assert_eq!(cell.execution_count(), None);
        assert!(!cell.to_mapping().contains_key("execution_count"));
    }

    #[test]
    fn test_to_mapping_code_cell_keeps_null_count() {
        let cell = Cell::code("c1", Map::new(), lines(&["print(1)"]), None);
        let mapping = cell.to_mapping();
        assert_eq!(mapping.get("execution_count"), Some(&Value::Null));

        let keys: Vec<&str> = mapping.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["cell_type", "execution_count", "id", "metadata", "source"]);
    }

    #[test]
    fn test_from_mapping_parses_cell() {
        let value = json!({
            "cell_type": "code",
            "execution_count": 3,
            "id": "abc",
            "metadata": {"tags": ["setup"]},
            "outputs": [],
            "source": ["import os\n", "print(os.getcwd())"]
        });
        let cell = Cell::from_mapping(&value, 0).unwrap();
        assert_eq!(cell.id(), "abc");
        assert_eq!(cell.execution_count(), Some(3));
        assert_eq!(cell.source().len(), 2);
        assert_eq!(cell.metadata()["tags"], json!(["setup"]));
        assert!(!cell.to_mapping().contains_key("outputs"));
    }

    #[test]
    fn test_from_mapping_accepts_string_source() {
        let value = json!({
            "cell_type": "markdown",
            "id": "m",
            "metadata": {},
            "source": "# Title\nBody"
        });
        let cell = Cell::from_mapping(&value, 0).unwrap();
        assert_eq!(cell.source(), &["# Title\n".to_string(), "Body".to_string()]);
    }

    #[test]
    fn test_from_mapping_reports_missing_fields() {
        let no_count = json!({"cell_type": "code", "id": "c", "metadata": {}, "source": []});
        assert!(matches!(
            Cell::from_mapping(&no_count, 4),
            Err(NotebookError::MissingField { ref field, cell_index: Some(4) }) if field == "execution_count"
        ));

        let no_id = json!({"cell_type": "raw", "metadata": {}, "source": []});
        assert!(matches!(
            Cell::from_mapping(&no_id, 1),
            Err(NotebookError::MissingField { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_from_mapping_rejects_unknown_cell_type() {
        let value = json!({"cell_type": "heading", "id": "h", "metadata": {}, "source": []});
        assert!(matches!(
            Cell::from_mapping(&value, 0),
            Err(NotebookError::FormatError { .. })
        ));
    }

    #[test]
    fn test_replace_in_source_leaves_original_untouched() {
        let cell = Cell::code("c1", Map::new(), lines(&["df_modular-word = load('modular-word')"]), Some(1));
        let replaced = cell.replace_in_source("modular-word", "sales");

        assert_eq!(replaced.source(), &["df_sales = load('sales')".to_string()]);
        assert_eq!(cell.source(), &["df_modular-word = load('modular-word')".to_string()]);
        assert_eq!(replaced.id(), cell.id());
        assert_eq!(replaced.execution_count(), Some(1));
    }

    #[test]
    fn test_display() {
        let cell = Cell::raw("r1", Map::new(), vec![]);
        assert_eq!(cell.to_string(), "Cell(id=r1, cell_type=raw)");
    }
}
