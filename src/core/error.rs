use thiserror::Error;

use crate::core::solver::SolverError;

/// Errors raised while building a cost matrix or assembling matches.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Criterion {criterion} scored {score} for mentee {mentee} and mentor {mentor}, below 0")]
    NegativeScore {
        criterion: usize,
        mentee: usize,
        mentor: usize,
        score: i32,
    },

    #[error("Score for mentee {mentee} and mentor {mentor} reaches the prohibitive cost after criterion {criterion}")]
    ScoreOverflow {
        criterion: usize,
        mentee: usize,
        mentor: usize,
    },

    #[error("No feasible assignment: {side} {index} cannot get an allowed counterpart")]
    Infeasible { side: &'static str, index: usize },

    #[error("Unknown mentee: {0}")]
    UnknownMentee(String),

    #[error("Unknown mentor: {0}")]
    UnknownMentor(String),

    #[error("Cell ({row}, {col}) is outside a {rows}x{cols} cost matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Solver assigned {side} {index} to out-of-range index {assigned}")]
    InvalidAssignment {
        side: &'static str,
        index: usize,
        assigned: usize,
    },

    #[error("Solver returned {actual} {side} assignments for {expected} candidates")]
    AssignmentLength {
        side: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}
