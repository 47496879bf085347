//! Assignment solvers consumed by the cost matrix.
//!
//! A solver receives a dense, non-negative cost matrix and returns, for each row, the column it
//! is assigned to and, for each column, the row it is assigned to. A row or column without
//! counterpart is marked with a solver-specific sentinel, passed to the assembler alongside the
//! solver.

use thiserror::Error;

use crate::core::sentinel::UNASSIGNED_INDEX;

/// Errors reported by a solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("Cost matrix row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Row and column assignments computed by a solver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolverResult {
    row_assignments: Vec<usize>,
    column_assignments: Vec<usize>,
}

impl SolverResult {
    pub fn new(row_assignments: Vec<usize>, column_assignments: Vec<usize>) -> Self {
        Self {
            row_assignments,
            column_assignments,
        }
    }

    /// Column assigned to each row.
    pub fn row_assignments(&self) -> &[usize] {
        &self.row_assignments
    }

    /// Row assigned to each column.
    pub fn column_assignments(&self) -> &[usize] {
        &self.column_assignments
    }
}

/// Optimal assignment algorithm.
pub trait Solver: Send + Sync {
    fn solve(&self, costs: &[Vec<i32>]) -> Result<SolverResult, SolverError>;
}

/// Hungarian algorithm over rectangular matrices.
///
/// The matrix is padded to a square one with zero-cost dummy cells; rows or columns matched to
/// a dummy are reported as [`UNASSIGNED_INDEX`]. Potentials are kept in `i64` so prohibitive
/// costs cannot overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl HungarianSolver {
    pub fn new() -> Self {
        Self
    }

    /// Sentinel marking an unassigned row or column in this solver's results.
    pub const fn unassigned_index(&self) -> usize {
        UNASSIGNED_INDEX
    }
}

impl Solver for HungarianSolver {
    fn solve(&self, costs: &[Vec<i32>]) -> Result<SolverResult, SolverError> {
        let rows = costs.len();
        let cols = costs.first().map_or(0, Vec::len);
        for (row, values) in costs.iter().enumerate() {
            if values.len() != cols {
                return Err(SolverError::RaggedMatrix {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
        }

        let mut row_assignments = vec![UNASSIGNED_INDEX; rows];
        let mut column_assignments = vec![UNASSIGNED_INDEX; cols];
        if rows == 0 || cols == 0 {
            return Ok(SolverResult::new(row_assignments, column_assignments));
        }

        let size = rows.max(cols);
        let cost = |i: usize, j: usize| -> i64 {
            if i < rows && j < cols {
                i64::from(costs[i][j])
            } else {
                0
            }
        };

        // 1-indexed potentials; index 0 is the virtual root of each augmenting search
        const INF: i64 = i64::MAX / 4;
        let mut u = vec![0i64; size + 1];
        let mut v = vec![0i64; size + 1];
        let mut column_owner = vec![0usize; size + 1];
        let mut way = vec![0usize; size + 1];

        for i in 1..=size {
            column_owner[0] = i;
            let mut j0 = 0usize;
            let mut min_values = vec![INF; size + 1];
            let mut used = vec![false; size + 1];
            loop {
                used[j0] = true;
                let i0 = column_owner[j0];
                let mut delta = INF;
                let mut j1 = 0usize;
                for j in 1..=size {
                    if used[j] {
                        continue;
                    }
                    let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                    if reduced < min_values[j] {
                        min_values[j] = reduced;
                        way[j] = j0;
                    }
                    if min_values[j] < delta {
                        delta = min_values[j];
                        j1 = j;
                    }
                }
                for j in 0..=size {
                    if used[j] {
                        u[column_owner[j]] += delta;
                        v[j] -= delta;
                    } else {
                        min_values[j] -= delta;
                    }
                }
                j0 = j1;
                if column_owner[j0] == 0 {
                    break;
                }
            }
            loop {
                let j1 = way[j0];
                column_owner[j0] = column_owner[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        for j in 1..=size {
            let (row, col) = (column_owner[j] - 1, j - 1);
            if row < rows && col < cols {
                row_assignments[row] = col;
                column_assignments[col] = row;
            }
        }
        tracing::trace!(rows, cols, "Hungarian solver finished");
        Ok(SolverResult::new(row_assignments, column_assignments))
    }
}
