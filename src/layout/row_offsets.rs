//! Cumulative row offsets for variable-height rows.

use serde::Serialize;

/// Pre-computed top offsets for rows whose heights differ.
///
/// `offsets[i]` is the y of row `i`'s top edge; `total_height` is the bottom
/// edge of the last row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowOffsets {
    pub offsets: Vec<f64>,
    pub heights: Vec<f64>,
    pub total_height: f64,
}

impl RowOffsets {
    /// Build offsets from per-row heights in a single forward pass.
    pub fn from_heights(heights: impl IntoIterator<Item = f64>) -> Self {
        let mut offsets = Vec::new();
        let mut kept = Vec::new();
        let mut top = 0.0;
        for height in heights {
            let height = height.max(0.0);
            offsets.push(top);
            kept.push(height);
            top += height;
        }
        Self {
            offsets,
            heights: kept,
            total_height: top,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Top offset of a row; indices past the end map to the total height.
    pub fn offset(&self, index: usize) -> f64 {
        self.offsets.get(index).copied().unwrap_or(self.total_height)
    }

    pub fn height(&self, index: usize) -> f64 {
        self.heights.get(index).copied().unwrap_or(0.0)
    }

    /// Row containing pixel `y` (binary search), clamped to the last row.
    pub fn row_at_offset(&self, y: f64) -> Option<usize> {
        if self.offsets.is_empty() {
            return None;
        }
        let index = match self
            .offsets
            .binary_search_by(|pos| pos.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Some(index.min(self.offsets.len() - 1))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_accumulate() {
        let offsets = RowOffsets::from_heights([20.0, 40.0, 20.0]);
        assert_eq!(offsets.offsets, vec![0.0, 20.0, 60.0]);
        assert_eq!(offsets.total_height, 80.0);
        assert_eq!(offsets.offset(3), 80.0);
    }

    #[test]
    fn test_row_at_offset() {
        let offsets = RowOffsets::from_heights([20.0, 40.0, 20.0]);
        assert_eq!(offsets.row_at_offset(0.0), Some(0));
        assert_eq!(offsets.row_at_offset(19.9), Some(0));
        assert_eq!(offsets.row_at_offset(20.0), Some(1));
        assert_eq!(offsets.row_at_offset(59.0), Some(1));
        assert_eq!(offsets.row_at_offset(500.0), Some(2));
        assert_eq!(RowOffsets::default().row_at_offset(0.0), None);
    }
}
