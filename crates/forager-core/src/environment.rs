//! Rectangular grid of resource values that agents forage from.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvironmentError {
    #[error("environment grid has no cells")]
    Empty,
    #[error("row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) holds {value}, values must be finite and non-negative")]
    InvalidCell { row: usize, col: usize, value: f64 },
}

/// Row-major grid of non-negative resource values.
///
/// Cells are addressed as `(row, col)`, i.e. `(y, x)` for an agent. The grid is
/// never resized after construction. Addressing a cell outside the grid is an
/// invariant violation and panics.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    width: usize,
    height: usize,
    data: Vec<f64>,
    total: f64,
}

impl Environment {
    /// Build a `width` x `height` grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        assert!(
            value.is_finite() && value >= 0.0,
            "cell value must be finite and non-negative"
        );
        Self {
            width,
            height,
            data: vec![value; width * height],
            total: value * (width * height) as f64,
        }
    }

    /// Build a grid from rows of cell values. All rows must share one length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, EnvironmentError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(EnvironmentError::Empty);
        }

        let mut data = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(EnvironmentError::RaggedRow {
                    row,
                    expected: width,
                    actual: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(EnvironmentError::InvalidCell { row, col, value });
                }
            }
            data.extend(values);
        }
        let total = data.iter().sum();
        Ok(Self {
            width,
            height,
            data,
            total,
        })
    }

    /// Resource held by the cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.index(row, col)]
    }

    /// Remove `amount` from the cell at `(row, col)`.
    ///
    /// Callers are responsible for only subtracting what the cell holds.
    pub fn subtract(&mut self, row: usize, col: usize, amount: f64) {
        let idx = self.index(row, col);
        debug_assert!(
            self.data[idx] >= amount,
            "subtracting {amount} from cell ({row}, {col}) holding {}",
            self.data[idx]
        );
        self.data[idx] -= amount;
        self.total -= amount;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Running sum of every cell.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.width)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.width,
            self.height
        );
        row * self.width + col
    }
}
