use std::sync::Arc;

use crate::core::criteria::{SharedNecessaryCriterion, SharedProgressiveCriterion};
use crate::core::error::MatchError;
use crate::core::forbidden::ForbiddenMatchTarget;
use crate::core::sentinel::PROHIBITIVE_COST;
use crate::core::solver::{Solver, SolverResult};

/// Dense cost matrix between mentees (rows) and mentors (columns).
///
/// Cell `[i][j]` holds the sum of every progressive criterion for mentee `i` and mentor `j`.
/// A parallel allowed-grid records the cells excluded by necessary criteria and the cells
/// forbidden by an operator; an excluded cell always reads as [`PROHIBITIVE_COST`], whatever
/// its progressive score.
///
/// Not meant to be shared between threads that mutate it: one matrix backs one assembly.
pub struct CostMatrix<Mentee, Mentor> {
    mentees: Arc<Vec<Mentee>>,
    mentors: Arc<Vec<Mentor>>,
    scores: Vec<Vec<i32>>,
    necessary_allowed: Vec<Vec<bool>>,
    specifically_forbidden: Vec<Vec<bool>>,
}

impl<Mentee, Mentor> CostMatrix<Mentee, Mentor> {
    /// Build the matrix from the progressive criteria, applied left to right and summed.
    ///
    /// # Errors
    /// [`MatchError::NegativeScore`] if a criterion scores below zero,
    /// [`MatchError::ScoreOverflow`] if a partial sum leaves the `i32` range or reaches
    /// [`PROHIBITIVE_COST`], which would make the cell look forbidden.
    pub fn new(
        mentees: Arc<Vec<Mentee>>,
        mentors: Arc<Vec<Mentor>>,
        progressive_criteria: &[SharedProgressiveCriterion<Mentee, Mentor>],
    ) -> Result<Self, MatchError> {
        let mut scores = Vec::with_capacity(mentees.len());
        for (i, mentee) in mentees.iter().enumerate() {
            let row = mentors
                .iter()
                .enumerate()
                .map(|(j, mentor)| progressive_score(progressive_criteria, i, mentee, j, mentor))
                .collect::<Result<Vec<i32>, MatchError>>()?;
            scores.push(row);
        }

        let (rows, cols) = (mentees.len(), mentors.len());
        tracing::debug!(
            rows,
            cols,
            criteria = progressive_criteria.len(),
            "Cost matrix built"
        );

        Ok(Self {
            mentees,
            mentors,
            scores,
            necessary_allowed: vec![vec![true; cols]; rows],
            specifically_forbidden: vec![vec![false; cols]; rows],
        })
    }

    /// Exclude every cell for which any necessary criterion fails.
    ///
    /// Replaces the exclusions of a previous call. Operator forbids are kept.
    pub fn with_necessary_criteria(
        mut self,
        necessary_criteria: &[SharedNecessaryCriterion<Mentee, Mentor>],
    ) -> Self {
        let mut excluded = 0usize;
        for (i, mentee) in self.mentees.iter().enumerate() {
            for (j, mentor) in self.mentors.iter().enumerate() {
                let allowed = necessary_criteria
                    .iter()
                    .all(|criterion| criterion.test(mentee, mentor));
                if !allowed {
                    excluded += 1;
                }
                self.necessary_allowed[i][j] = allowed;
            }
        }
        tracing::debug!(
            criteria = necessary_criteria.len(),
            excluded,
            "Necessary criteria applied"
        );
        self
    }

    pub fn rows(&self) -> usize {
        self.scores.len()
    }

    pub fn cols(&self) -> usize {
        self.mentors.len()
    }

    pub fn mentees(&self) -> &Arc<Vec<Mentee>> {
        &self.mentees
    }

    pub fn mentors(&self) -> &Arc<Vec<Mentor>> {
        &self.mentors
    }

    /// Current cost of a cell: its progressive score, or [`PROHIBITIVE_COST`] if it is not
    /// allowed.
    ///
    /// # Panics
    /// If the cell lies outside the matrix.
    pub fn get_match_score(&self, mentee_index: usize, mentor_index: usize) -> i32 {
        if self.is_match_allowed(mentee_index, mentor_index) {
            self.scores[mentee_index][mentor_index]
        } else {
            PROHIBITIVE_COST
        }
    }

    /// # Panics
    /// If the cell lies outside the matrix.
    pub fn is_match_allowed(&self, mentee_index: usize, mentor_index: usize) -> bool {
        self.necessary_allowed[mentee_index][mentor_index]
            && !self.specifically_forbidden[mentee_index][mentor_index]
    }

    /// Forbid a cell. Returns `true` if the cell was allowed before the call.
    pub fn forbid_match(
        &mut self,
        mentee_index: usize,
        mentor_index: usize,
    ) -> Result<bool, MatchError> {
        self.check_bounds(mentee_index, mentor_index)?;
        let was_allowed = self.is_match_allowed(mentee_index, mentor_index);
        self.specifically_forbidden[mentee_index][mentor_index] = true;
        Ok(was_allowed)
    }

    /// Lift an operator forbid on a cell. Returns `true` if the cell is allowed after the call
    /// and was not before. Cells excluded by necessary criteria stay excluded.
    pub fn allow_match(
        &mut self,
        mentee_index: usize,
        mentor_index: usize,
    ) -> Result<bool, MatchError> {
        self.check_bounds(mentee_index, mentor_index)?;
        let was_allowed = self.is_match_allowed(mentee_index, mentor_index);
        self.specifically_forbidden[mentee_index][mentor_index] = false;
        Ok(!was_allowed && self.is_match_allowed(mentee_index, mentor_index))
    }

    /// Lift every operator forbid.
    pub fn clear_specifically_forbidden_matches(&mut self) {
        for row in &mut self.specifically_forbidden {
            row.fill(false);
        }
    }

    /// Solve the whole matrix. The matrix itself is left untouched, so repeated calls return
    /// identical results for a deterministic solver.
    pub fn solve_cost_matrix(&self, solver: &dyn Solver) -> Result<SolverResult, MatchError> {
        let rows: Vec<usize> = (0..self.rows()).collect();
        let cols: Vec<usize> = (0..self.cols()).collect();
        self.solve_partial_cost_matrix(solver, &rows, &cols)
    }

    /// Solve the sub-matrix made of the given rows and columns, in the given order. Indices in
    /// the result refer to positions in `mentee_indices` and `mentor_indices`.
    pub fn solve_partial_cost_matrix(
        &self,
        solver: &dyn Solver,
        mentee_indices: &[usize],
        mentor_indices: &[usize],
    ) -> Result<SolverResult, MatchError> {
        let mut costs = Vec::with_capacity(mentee_indices.len());
        for &i in mentee_indices {
            let mut row = Vec::with_capacity(mentor_indices.len());
            for &j in mentor_indices {
                self.check_bounds(i, j)?;
                row.push(self.get_match_score(i, j));
            }
            costs.push(row);
        }
        Ok(solver.solve(&costs)?)
    }

    /// Check that every candidate on the smaller side of the matrix keeps at least one allowed
    /// counterpart, without which no complete assignment of that side exists.
    pub fn check_feasibility(&self) -> Result<(), MatchError> {
        let (rows, cols) = (self.rows(), self.cols());
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        if rows <= cols {
            if let Some(i) = (0..rows).find(|&i| (0..cols).all(|j| !self.is_match_allowed(i, j))) {
                return Err(MatchError::Infeasible {
                    side: "mentee",
                    index: i,
                });
            }
        }
        if cols <= rows {
            if let Some(j) = (0..cols).find(|&j| (0..rows).all(|i| !self.is_match_allowed(i, j))) {
                return Err(MatchError::Infeasible {
                    side: "mentor",
                    index: j,
                });
            }
        }
        Ok(())
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), MatchError> {
        if row < self.rows() && col < self.cols() {
            Ok(())
        } else {
            Err(MatchError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }
}

impl<Mentee, Mentor> ForbiddenMatchTarget for CostMatrix<Mentee, Mentor> {
    fn forbid_match(&mut self, mentee_index: usize, mentor_index: usize) -> Result<bool, MatchError> {
        CostMatrix::forbid_match(self, mentee_index, mentor_index)
    }

    fn allow_match(&mut self, mentee_index: usize, mentor_index: usize) -> Result<bool, MatchError> {
        CostMatrix::allow_match(self, mentee_index, mentor_index)
    }

    fn clear_specifically_forbidden_matches(&mut self) {
        CostMatrix::clear_specifically_forbidden_matches(self)
    }
}

fn progressive_score<Mentee, Mentor>(
    criteria: &[SharedProgressiveCriterion<Mentee, Mentor>],
    mentee_index: usize,
    mentee: &Mentee,
    mentor_index: usize,
    mentor: &Mentor,
) -> Result<i32, MatchError> {
    let mut total: i32 = 0;
    for (criterion_index, criterion) in criteria.iter().enumerate() {
        let score = criterion.score(mentee, mentor);
        if score < 0 {
            return Err(MatchError::NegativeScore {
                criterion: criterion_index,
                mentee: mentee_index,
                mentor: mentor_index,
                score,
            });
        }
        total = total
            .checked_add(score)
            .filter(|&total| total < PROHIBITIVE_COST)
            .ok_or(MatchError::ScoreOverflow {
            criterion: criterion_index,
            mentee: mentee_index,
            mentor: mentor_index,
        })?;
    }
    Ok(total)
}
