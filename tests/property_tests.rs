//! Property-based tests for notebook concatenation and modular expansion.

use notebook_builder::{build_modular_notebook, Cell, Notebook, DEFAULT_KEYWORD};
use proptest::prelude::*;
use serde_json::Map;

// =============================================================================
// Strategies
// =============================================================================

/// Plain cells that never look like section markers.
fn cell_strategy() -> impl Strategy<Value = Cell> {
    (
        prop_oneof![Just(0u8), Just(1u8), Just(2u8)],
        "[a-z0-9]{1,8}",
        prop::collection::vec("[A-Za-z0-9 ()=]{0,16}", 0..4),
        prop::option::of(0u64..100),
    )
        .prop_map(|(kind, id, source, count)| match kind {
            0 => Cell::code(id, Map::new(), source, count),
            1 => Cell::markdown(id, Map::new(), source),
            _ => Cell::raw(id, Map::new(), source),
        })
}

fn cells_strategy() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::vec(cell_strategy(), 0..6)
}

/// Source lines made of keyword-free chunks; the keyword sits between chunks.
fn template_line_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Z0-9 ]{0,6}", 1..5)
}

fn marker(id: &str, text: &str) -> Cell {
    Cell::markdown(id, Map::new(), vec![text.to_string()])
}

fn sectioned(prefix: &[Cell], template: &[Cell], suffix: &[Cell]) -> Notebook {
    let mut cells = prefix.to_vec();
    cells.push(marker("start", "[start-modular-section]"));
    cells.extend_from_slice(template);
    cells.push(marker("end", "[end-modular-section]"));
    cells.extend_from_slice(suffix);
    Notebook::with_cells("template", cells)
}

// =============================================================================
// Concatenation
// =============================================================================

proptest! {
    /// append keeps cell order: (A ++ B) ++ C == A.cells ++ B.cells ++ C.cells
    #[test]
    fn append_preserves_order(a in cells_strategy(), b in cells_strategy(), c in cells_strategy()) {
        let (na, nb, nc) = (
            Notebook::with_cells("a", a.clone()),
            Notebook::with_cells("b", b.clone()),
            Notebook::with_cells("c", c.clone()),
        );

        let left = na.append(&nb, None).append(&nc, None);
        let right = na.append(&nb.append(&nc, None), None);

        let expected: Vec<Cell> = a.into_iter().chain(b).chain(c).collect();
        prop_assert_eq!(left.cells(), expected.as_slice());
        prop_assert_eq!(right.cells(), expected.as_slice());
    }
}

// =============================================================================
// Modular expansion
// =============================================================================

proptest! {
    /// Zero titles: output is exactly prefix ++ suffix
    #[test]
    fn zero_titles_is_prefix_then_suffix(
        prefix in cells_strategy(),
        template in cells_strategy(),
        suffix in cells_strategy(),
    ) {
        let notebook = sectioned(&prefix, &template, &suffix);
        let titles: Vec<String> = Vec::new();
        let output = build_modular_notebook(&notebook, "out", &titles, DEFAULT_KEYWORD).unwrap();

        let expected: Vec<Cell> = prefix.into_iter().chain(suffix).collect();
        prop_assert_eq!(output.cells(), expected.as_slice());
    }

    /// Output length is prefix + template * titles + suffix
    #[test]
    fn output_length_matches_plan(
        prefix in cells_strategy(),
        template in cells_strategy(),
        suffix in cells_strategy(),
        titles in prop::collection::vec("[a-z]{1,8}", 0..5),
    ) {
        let notebook = sectioned(&prefix, &template, &suffix);
        let output = build_modular_notebook(&notebook, "out", &titles, DEFAULT_KEYWORD).unwrap();
        prop_assert_eq!(
            output.len(),
            prefix.len() + template.len() * titles.len() + suffix.len()
        );
    }

    /// Every keyword occurrence is replaced, in every repetition, in title order
    #[test]
    fn substitution_is_complete(
        chunks in template_line_strategy(),
        titles in prop::collection::vec("[a-z]{1,8}", 1..5),
    ) {
        let line = chunks.join(DEFAULT_KEYWORD);
        let template = vec![Cell::code("body", Map::new(), vec![line.clone()], None)];
        let notebook = sectioned(&[], &template, &[]);

        let output = build_modular_notebook(&notebook, "out", &titles, DEFAULT_KEYWORD).unwrap();
        prop_assert_eq!(output.len(), titles.len());

        for (cell, title) in output.cells().iter().zip(&titles) {
            prop_assert_eq!(&cell.source()[0], &chunks.join(title.as_str()));
            prop_assert!(!cell.source()[0].contains(DEFAULT_KEYWORD));
        }

        // the template cell still holds the keyword
        prop_assert_eq!(&notebook.cells()[1].source()[0], &line);
    }
}
