//! The fixed recompute order: filter, sort, paginate, virtualize.
//!
//! Engines never observe each other; every state change that can affect
//! row order or count runs the whole chain again through [`recompute`].
//! Rows are addressed by their index in the source slice throughout.

use serde::Serialize;
use tracing::debug;

use crate::filter::{FilterEngine, QuickFilter};
use crate::layout::{RowOffsets, VirtualScroller};
use crate::pagination::Pagination;
use crate::rows::RowStyling;
use crate::sort::SortEngine;
use crate::types::{ColumnDef, Row, SortItem, VisibleRange};

/// Read-only inputs of a recompute.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInput<'a> {
    /// Column definitions with runtime visibility applied.
    pub columns: &'a [ColumnDef],
    pub quick_filter_text: &'a str,
    pub sort_model: &'a [SortItem],
}

/// Engines updated by a recompute.
pub struct PipelineStages<'e> {
    pub filter: &'e FilterEngine,
    pub quick_filter: &'e mut QuickFilter,
    /// `None` when pagination is off: the page is every filtered row.
    pub pagination: Option<&'e mut Pagination>,
    pub scroller: &'e mut VirtualScroller,
    /// Installs variable row heights on the scroller when it has a height hook.
    pub styling: Option<&'e RowStyling>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Source indices of every row passing the filters, in display order.
    pub display_indices: Vec<usize>,
    /// Source indices of the current page.
    pub page_indices: Vec<usize>,
    /// Window over `page_indices` to materialize.
    pub visible_range: VisibleRange,
}

impl PipelineOutput {
    pub fn filtered_count(&self) -> usize {
        self.display_indices.len()
    }

    /// Source indices of the rows inside the visible window.
    pub fn visible_indices(&self) -> &[usize] {
        if self.page_indices.is_empty() {
            return &[];
        }
        let end = self
            .visible_range
            .end_index
            .saturating_add(1)
            .min(self.page_indices.len());
        let start = self.visible_range.start_index.min(end);
        self.page_indices.get(start..end).unwrap_or(&[])
    }
}

pub fn recompute(
    rows: &[Row],
    input: PipelineInput<'_>,
    stages: PipelineStages<'_>,
) -> PipelineOutput {
    let mut display_indices: Vec<usize> = (0..rows.len()).collect();

    stages.filter.retain_matching(rows, &mut display_indices);
    stages.quick_filter.retain_matching(
        rows,
        &mut display_indices,
        input.columns,
        input.quick_filter_text,
    );
    SortEngine::sort_positions(rows, &mut display_indices, input.sort_model, input.columns);

    let page_indices = match stages.pagination {
        Some(pagination) => {
            pagination.set_total_rows(display_indices.len());
            pagination.get_page_rows(&display_indices).to_vec()
        }
        None => display_indices.clone(),
    };

    let scroller = stages.scroller;
    let offsets = stages
        .styling
        .filter(|styling| styling.has_variable_heights())
        .map(|styling| {
            let default_height = scroller.row_height();
            RowOffsets::from_heights(page_indices.iter().enumerate().filter_map(|(i, &ri)| {
                rows.get(ri)
                    .map(|row| styling.get_row_height(row, i, default_height))
            }))
        });
    scroller.set_total_rows(page_indices.len());
    scroller.set_row_offsets(offsets);
    let visible_range = scroller.get_visible_range();

    debug!(
        total = rows.len(),
        filtered = display_indices.len(),
        page = page_indices.len(),
        start = visible_range.start_index,
        end = visible_range.end_index,
        "pipeline recomputed"
    );

    PipelineOutput {
        display_indices,
        page_indices,
        visible_range,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{ColumnFilter, ColumnType, FilterCondition, NumberFilterOperator};
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                json!({"id": i, "name": format!("row {i}"), "score": (i * 7) % 10})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id").with_type(ColumnType::Number),
            ColumnDef::new("name"),
            ColumnDef::new("score").with_type(ColumnType::Number),
        ]
    }

    #[test]
    fn test_identity_without_state() {
        let data = rows(5);
        let cols = columns();
        let filter = FilterEngine::new();
        let mut quick = QuickFilter::new();
        let mut scroller = VirtualScroller::default();
        let out = recompute(
            &data,
            PipelineInput {
                columns: &cols,
                quick_filter_text: "",
                sort_model: &[],
            },
            PipelineStages {
                filter: &filter,
                quick_filter: &mut quick,
                pagination: None,
                scroller: &mut scroller,
                styling: None,
            },
        );
        assert_eq!(out.display_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(out.page_indices, out.display_indices);
        assert_eq!(out.visible_indices(), &[0, 1, 2, 3, 4]);
        assert_eq!(scroller.total_rows(), 5);
    }

    #[test]
    fn test_filter_then_sort_then_page() {
        let data = rows(30);
        let cols = columns();
        let mut filter = FilterEngine::new();
        filter.set_filter(ColumnFilter::new(
            "score",
            FilterCondition::Number {
                operator: NumberFilterOperator::GreaterThanOrEqual,
                value: 5.0,
            },
        ));
        let mut quick = QuickFilter::new();
        let mut pagination = Pagination::new(4);
        pagination.set_total_rows(30);
        pagination.go_to_page(2);
        let mut scroller = VirtualScroller::default();
        let sort = [SortItem::desc("score")];

        let out = recompute(
            &data,
            PipelineInput {
                columns: &cols,
                quick_filter_text: "",
                sort_model: &sort,
            },
            PipelineStages {
                filter: &filter,
                quick_filter: &mut quick,
                pagination: Some(&mut pagination),
                scroller: &mut scroller,
                styling: None,
            },
        );

        assert_eq!(out.filtered_count(), 15);
        let scores: Vec<i64> = out
            .display_indices
            .iter()
            .map(|&i| data[i]["score"].as_i64().unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|&s| s >= 5));
        assert_eq!(out.page_indices, out.display_indices[4..8].to_vec());
        assert_eq!(pagination.total_pages(), 4);
        assert_eq!(scroller.total_rows(), 4);
    }

    #[test]
    fn test_variable_heights_installed() {
        let data = rows(3);
        let cols = columns();
        let filter = FilterEngine::new();
        let mut quick = QuickFilter::new();
        let mut scroller = VirtualScroller::new(10.0, 100.0);
        let styling = RowStyling::new().with_row_height(|_, i| (i == 1).then_some(50.0));
        recompute(
            &data,
            PipelineInput {
                columns: &cols,
                quick_filter_text: "",
                sort_model: &[],
            },
            PipelineStages {
                filter: &filter,
                quick_filter: &mut quick,
                pagination: None,
                scroller: &mut scroller,
                styling: Some(&styling),
            },
        );
        assert!((scroller.total_content_height() - 70.0).abs() < 1e-9);
        assert!((scroller.get_row_offset(2) - 60.0).abs() < 1e-9);
    }
}
