use crate::domain::model::{Cell, CellType};
use crate::domain::notebook::Notebook;
use crate::utils::error::{NotebookError, Result};
use std::ops::Range;
use std::path::Path;

pub const START_MARKER: &str = "[start-modular-section]";
pub const END_MARKER: &str = "[end-modular-section]";
pub const DEFAULT_KEYWORD: &str = "modular-word";

/// Positions of the two marker cells inside a notebook's cell list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModularSection {
    pub start_marker: usize,
    pub end_marker: usize,
    total_cells: usize,
}

impl ModularSection {
    /// Cells before the start marker.
    pub fn prefix(&self) -> Range<usize> {
        0..self.start_marker
    }

    /// Cells strictly between the two markers.
    pub fn template(&self) -> Range<usize> {
        self.start_marker + 1..self.end_marker
    }

    /// Cells after the end marker.
    pub fn suffix(&self) -> Range<usize> {
        self.end_marker + 1..self.total_cells
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Start,
    End,
}

fn classify(cell: &Cell) -> Option<Marker> {
    if cell.cell_type() != CellType::Markdown {
        return None;
    }
    let first_line = cell.first_line()?;
    if first_line.contains(START_MARKER) {
        Some(Marker::Start)
    } else if first_line.contains(END_MARKER) {
        Some(Marker::End)
    } else {
        None
    }
}

fn single_marker(indices: Vec<usize>, marker: &str) -> Result<usize> {
    match indices.len() {
        0 => Err(NotebookError::MarkerNotFound {
            marker: marker.to_string(),
        }),
        1 => Ok(indices[0]),
        _ => Err(NotebookError::AmbiguousSection {
            marker: marker.to_string(),
            indices,
        }),
    }
}

/// Finds the modular section. Exactly one start marker and one end marker
/// after it are required.
pub fn locate_modular_section(cells: &[Cell]) -> Result<ModularSection> {
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    for (index, cell) in cells.iter().enumerate() {
        match classify(cell) {
            Some(Marker::Start) => starts.push(index),
            Some(Marker::End) => ends.push(index),
            None => {}
        }
    }

    let start_marker = single_marker(starts, START_MARKER)?;
    let end_marker = single_marker(ends, END_MARKER)?;
    if end_marker < start_marker {
        return Err(NotebookError::MarkerNotFound {
            marker: format!("{} after cell {}", END_MARKER, start_marker),
        });
    }

    Ok(ModularSection {
        start_marker,
        end_marker,
        total_cells: cells.len(),
    })
}

/// One repetition of the template: fresh cells with `keyword` replaced by
/// `title` on every source line.
pub fn expand_template(template: &[Cell], title: &str, keyword: &str) -> Vec<Cell> {
    template
        .iter()
        .map(|cell| cell.replace_in_source(keyword, title))
        .collect()
}

/// Builds a new notebook at `path`: prefix, then one expanded copy of the
/// modular section per title in list order, then suffix. `template` is left
/// untouched and its metadata carries over to the result.
pub fn build_modular_notebook<T: AsRef<str>>(
    template: &Notebook,
    path: impl AsRef<Path>,
    titles: &[T],
    keyword: &str,
) -> Result<Notebook> {
    // Replacing "" would splice the title between every character.
    if keyword.is_empty() {
        return Err(NotebookError::InvalidConfigValueError {
            field: "keyword".to_string(),
            value: String::new(),
            reason: "Keyword cannot be empty".to_string(),
        });
    }

    let path = path.as_ref();
    let cells = template.cells();
    let section = locate_modular_section(cells)?;
    tracing::debug!(
        "Modular section spans cells {}..{} of {}",
        section.start_marker,
        section.end_marker,
        cells.len()
    );

    let modular_cells = &cells[section.template()];
    let mut accumulator = Notebook::new(
        path,
        cells[section.prefix()].to_vec(),
        template.metadata().clone(),
    );

    for title in titles {
        let title = title.as_ref();
        let repetition = Notebook::with_cells(path, expand_template(modular_cells, title, keyword));
        tracing::debug!("Expanded {} cells for '{}'", repetition.len(), title);
        accumulator = accumulator.append(&repetition, None);
    }

    let suffix = Notebook::with_cells(path, cells[section.suffix()].to_vec());
    Ok(accumulator.append(&suffix, None))
}

/// Summary of what an expansion would produce, without building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionPlan {
    pub prefix_cells: usize,
    pub template_cells: usize,
    pub suffix_cells: usize,
    pub titles: Vec<String>,
}

impl ExpansionPlan {
    pub fn output_cells(&self) -> usize {
        self.prefix_cells + self.template_cells * self.titles.len() + self.suffix_cells
    }
}

/// A loaded notebook used as a modular template.
#[derive(Debug, Clone)]
pub struct ModularTemplate {
    notebook: Notebook,
    keyword: String,
}

impl ModularTemplate {
    pub fn new(notebook: Notebook) -> Self {
        Self::with_keyword(notebook, DEFAULT_KEYWORD)
    }

    pub fn with_keyword(notebook: Notebook, keyword: impl Into<String>) -> Self {
        Self {
            notebook,
            keyword: keyword.into(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Notebook::load(path)?))
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn section(&self) -> Result<ModularSection> {
        locate_modular_section(self.notebook.cells())
    }

    pub fn build<T: AsRef<str>>(&self, path: impl AsRef<Path>, titles: &[T]) -> Result<Notebook> {
        build_modular_notebook(&self.notebook, path, titles, &self.keyword)
    }

    pub fn plan<T: AsRef<str>>(&self, titles: &[T]) -> Result<ExpansionPlan> {
        let section = self.section()?;
        Ok(ExpansionPlan {
            prefix_cells: section.prefix().len(),
            template_cells: section.template().len(),
            suffix_cells: section.suffix().len(),
            titles: titles.iter().map(|t| t.as_ref().to_string()).collect(),
        })
    }
}
