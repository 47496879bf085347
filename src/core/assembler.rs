use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::core::cost_matrix::CostMatrix;
use crate::core::criteria::{SharedNecessaryCriterion, SharedProgressiveCriterion};
use crate::core::error::MatchError;
use crate::core::forbidden::ForbiddenMatches;
use crate::core::sentinel::UNASSIGNED_SCORE;
use crate::core::solver::{HungarianSolver, Solver, SolverResult};
use crate::models::{Match, Matches};

/// Turns two candidate lists and their criteria into an optimal set of [`Matches`].
///
/// The simplest use is `MatchAssembler::new(mentees, mentors, &criteria)?.build()`; the `with_*`
/// methods tweak the solver, the necessary criteria and the treatment of unassigned candidates.
///
/// One assembler backs one assembly run. It is not meant to be shared between threads while its
/// forbidden matches are being edited.
pub struct MatchAssembler<Mentee, Mentor> {
    cost_matrix: CostMatrix<Mentee, Mentor>,
    solver: Arc<dyn Solver>,
    unassigned_index: usize,
    placeholders: Option<(Mentee, Mentor)>,
    mentee_indices: HashMap<Mentee, usize>,
    mentor_indices: HashMap<Mentor, usize>,
}

impl<Mentee, Mentor> std::fmt::Debug for MatchAssembler<Mentee, Mentor> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchAssembler")
            .field("unassigned_index", &self.unassigned_index)
            .field("placeholders", &self.placeholders.is_some())
            .field("mentees", &self.mentee_indices.len())
            .field("mentors", &self.mentor_indices.len())
            .finish()
    }
}

impl<Mentee, Mentor> MatchAssembler<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone,
    Mentor: Eq + Hash + Clone,
{
    pub fn new(
        mentees: Arc<Vec<Mentee>>,
        mentors: Arc<Vec<Mentor>>,
        progressive_criteria: &[SharedProgressiveCriterion<Mentee, Mentor>],
    ) -> Result<Self, MatchError> {
        let cost_matrix = CostMatrix::new(mentees, mentors, progressive_criteria)?;
        Ok(Self::from_cost_matrix(cost_matrix))
    }

    /// Wrap an already built cost matrix. Uses the [`HungarianSolver`] until
    /// [`with_solver`](Self::with_solver) says otherwise.
    pub fn from_cost_matrix(cost_matrix: CostMatrix<Mentee, Mentor>) -> Self {
        let mentee_indices = index_of(cost_matrix.mentees());
        let mentor_indices = index_of(cost_matrix.mentors());
        let solver = HungarianSolver::new();
        Self {
            unassigned_index: solver.unassigned_index(),
            solver: Arc::new(solver),
            cost_matrix,
            placeholders: None,
            mentee_indices,
            mentor_indices,
        }
    }

    pub fn with_necessary_criteria(
        mut self,
        necessary_criteria: &[SharedNecessaryCriterion<Mentee, Mentor>],
    ) -> Self {
        self.cost_matrix = self.cost_matrix.with_necessary_criteria(necessary_criteria);
        self
    }

    /// Replace the solver. `unassigned_index` is the value this solver writes for a row or a
    /// column left without counterpart.
    pub fn with_solver(mut self, solver: Arc<dyn Solver>, unassigned_index: usize) -> Self {
        self.solver = solver;
        self.unassigned_index = unassigned_index;
        self
    }

    /// Pair every unassigned mentee with `mentor` and every unassigned mentor with `mentee`,
    /// at [`UNASSIGNED_SCORE`]. Without placeholders, unassigned candidates are left out of the
    /// result.
    pub fn with_placeholder_persons(mut self, mentee: Mentee, mentor: Mentor) -> Self {
        self.placeholders = Some((mentee, mentor));
        self
    }

    pub fn cost_matrix(&self) -> &CostMatrix<Mentee, Mentor> {
        &self.cost_matrix
    }

    pub fn has_placeholders(&self) -> bool {
        self.placeholders.is_some()
    }

    /// Position of `mentee` in the mentee list. Duplicates resolve to the first position.
    pub fn mentee_index(&self, mentee: &Mentee) -> Option<usize> {
        self.mentee_indices.get(mentee).copied()
    }

    pub fn mentor_index(&self, mentor: &Mentor) -> Option<usize> {
        self.mentor_indices.get(mentor).copied()
    }

    /// Project a forbidden-match registry onto this assembler's cost matrix.
    pub fn apply_forbidden(
        &mut self,
        forbidden: &ForbiddenMatches<Mentee, Mentor>,
    ) -> Result<usize, MatchError> {
        let mentee_indices = &self.mentee_indices;
        let mentor_indices = &self.mentor_indices;
        forbidden.apply(
            &mut self.cost_matrix,
            |mentee| mentee_indices.get(mentee).copied(),
            |mentor| mentor_indices.get(mentor).copied(),
        )
    }

    /// Solve the whole problem.
    ///
    /// # Errors
    /// [`MatchError::Infeasible`] when no placeholders are set and a candidate on the smaller
    /// side cannot get an allowed counterpart, either because it has none or because the
    /// others took them; [`MatchError::InvalidAssignment`] or [`MatchError::AssignmentLength`]
    /// when the solver output does not fit the matrix.
    pub fn build(&self) -> Result<Matches<Mentee, Mentor>, MatchError> {
        if self.placeholders.is_none() {
            self.cost_matrix.check_feasibility()?;
        }
        let rows: Vec<usize> = (0..self.cost_matrix.rows()).collect();
        let cols: Vec<usize> = (0..self.cost_matrix.cols()).collect();
        let result = self.cost_matrix.solve_cost_matrix(self.solver.as_ref())?;
        let matches = self.format_result(&rows, &cols, &result)?;
        tracing::info!(
            mentees = rows.len(),
            mentors = cols.len(),
            matches = matches.len(),
            "Matches assembled"
        );
        Ok(matches)
    }

    /// Convert a solver result over the sub-matrix `rows` x `cols` into matches.
    ///
    /// Without placeholders every candidate of the smaller side must get an allowed
    /// counterpart; a prohibited cell picked for one of them means no complete assignment
    /// exists.
    fn format_result(
        &self,
        rows: &[usize],
        cols: &[usize],
        result: &SolverResult,
    ) -> Result<Matches<Mentee, Mentor>, MatchError> {
        // with one side empty the solver cannot tell the size of the other
        let unmatched;
        let result = if rows.is_empty() || cols.is_empty() {
            unmatched = SolverResult::new(
                vec![self.unassigned_index; rows.len()],
                vec![self.unassigned_index; cols.len()],
            );
            &unmatched
        } else {
            result
        };
        check_length("mentee", rows.len(), result.row_assignments().len())?;
        check_length("mentor", cols.len(), result.column_assignments().len())?;
        let mentees = self.cost_matrix.mentees();
        let mentors = self.cost_matrix.mentors();
        let complete_rows = self.placeholders.is_none() && rows.len() <= cols.len();
        let complete_cols = self.placeholders.is_none() && cols.len() <= rows.len();
        let mut matches = Vec::with_capacity(rows.len().max(cols.len()));

        for (position, (&i, &assigned)) in rows.iter().zip(result.row_assignments()).enumerate() {
            match self.selected_cell(rows, cols, position, assigned, complete_rows)? {
                Some((i, j)) => matches.push(Match::new(
                    mentees[i].clone(),
                    mentors[j].clone(),
                    self.cost_matrix.get_match_score(i, j),
                )),
                None => {
                    if let Some((_, placeholder)) = &self.placeholders {
                        matches.push(Match::new(
                            mentees[i].clone(),
                            placeholder.clone(),
                            UNASSIGNED_SCORE,
                        ));
                    }
                }
            }
        }

        for (&j, &assigned) in cols.iter().zip(result.column_assignments()) {
            if assigned == self.unassigned_index {
                if let Some((placeholder, _)) = &self.placeholders {
                    matches.push(Match::new(
                        placeholder.clone(),
                        mentors[j].clone(),
                        UNASSIGNED_SCORE,
                    ));
                }
                continue;
            }
            let Some(&i) = rows.get(assigned) else {
                return Err(MatchError::InvalidAssignment {
                    side: "mentor",
                    index: j,
                    assigned,
                });
            };
            if self.cost_matrix.is_match_allowed(i, j) {
                continue;
            }
            if complete_cols {
                return Err(MatchError::Infeasible {
                    side: "mentor",
                    index: j,
                });
            }
            if let Some((placeholder, _)) = &self.placeholders {
                matches.push(Match::new(
                    placeholder.clone(),
                    mentors[j].clone(),
                    UNASSIGNED_SCORE,
                ));
            }
        }

        Ok(Matches::new(matches))
    }

    /// Cell selected for row `position`, or `None` when the row is unassigned or the solver
    /// settled for a prohibited cell. With `complete`, a prohibited cell is an error.
    fn selected_cell(
        &self,
        rows: &[usize],
        cols: &[usize],
        position: usize,
        assigned: usize,
        complete: bool,
    ) -> Result<Option<(usize, usize)>, MatchError> {
        if assigned == self.unassigned_index {
            return Ok(None);
        }
        let i = rows[position];
        let Some(&j) = cols.get(assigned) else {
            return Err(MatchError::InvalidAssignment {
                side: "mentee",
                index: i,
                assigned,
            });
        };
        if self.cost_matrix.is_match_allowed(i, j) {
            Ok(Some((i, j)))
        } else if complete {
            Err(MatchError::Infeasible {
                side: "mentee",
                index: i,
            })
        } else {
            tracing::warn!(
                mentee = i,
                mentor = j,
                "Solver selected a prohibited match, treated as unassigned"
            );
            Ok(None)
        }
    }
}

impl<Mentee, Mentor> MatchAssembler<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone + Debug,
    Mentor: Eq + Hash + Clone + Debug,
{
    /// Forbid the match between two candidates. Returns `true` if it was allowed before.
    pub fn forbid_match(&mut self, mentee: &Mentee, mentor: &Mentor) -> Result<bool, MatchError> {
        let (i, j) = self.indices(mentee, mentor)?;
        self.cost_matrix.forbid_match(i, j)
    }

    /// Lift an operator forbid between two candidates. Returns `true` if the match became
    /// allowed.
    pub fn allow_match(&mut self, mentee: &Mentee, mentor: &Mentor) -> Result<bool, MatchError> {
        let (i, j) = self.indices(mentee, mentor)?;
        self.cost_matrix.allow_match(i, j)
    }

    /// Solve the problem restricted to the given candidates, in the given order. Placeholders,
    /// when set, only cover these candidates; without them the smaller of the two subsets must
    /// be fully matched, as in [`build`](MatchAssembler::build).
    pub fn build_partial(
        &self,
        mentees: &[Mentee],
        mentors: &[Mentor],
    ) -> Result<Matches<Mentee, Mentor>, MatchError> {
        let rows = mentees
            .iter()
            .map(|mentee| self.require_mentee(mentee))
            .collect::<Result<Vec<_>, _>>()?;
        let cols = mentors
            .iter()
            .map(|mentor| self.require_mentor(mentor))
            .collect::<Result<Vec<_>, _>>()?;
        let result =
            self.cost_matrix
                .solve_partial_cost_matrix(self.solver.as_ref(), &rows, &cols)?;
        let matches = self.format_result(&rows, &cols, &result)?;
        tracing::info!(
            mentees = rows.len(),
            mentors = cols.len(),
            matches = matches.len(),
            "Partial matches assembled"
        );
        Ok(matches)
    }

    /// The match between two given candidates, at its current cost.
    pub fn build_single_match(
        &self,
        mentee: &Mentee,
        mentor: &Mentor,
    ) -> Result<Match<Mentee, Mentor>, MatchError> {
        let (i, j) = self.indices(mentee, mentor)?;
        Ok(Match::new(
            mentee.clone(),
            mentor.clone(),
            self.cost_matrix.get_match_score(i, j),
        ))
    }

    fn indices(&self, mentee: &Mentee, mentor: &Mentor) -> Result<(usize, usize), MatchError> {
        Ok((self.require_mentee(mentee)?, self.require_mentor(mentor)?))
    }

    fn require_mentee(&self, mentee: &Mentee) -> Result<usize, MatchError> {
        self.mentee_index(mentee)
            .ok_or_else(|| MatchError::UnknownMentee(format!("{:?}", mentee)))
    }

    fn require_mentor(&self, mentor: &Mentor) -> Result<usize, MatchError> {
        self.mentor_index(mentor)
            .ok_or_else(|| MatchError::UnknownMentor(format!("{:?}", mentor)))
    }
}

fn check_length(side: &'static str, expected: usize, actual: usize) -> Result<(), MatchError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MatchError::AssignmentLength {
            side,
            expected,
            actual,
        })
    }
}

fn index_of<T: Eq + Hash + Clone>(values: &[T]) -> HashMap<T, usize> {
    let mut indices = HashMap::with_capacity(values.len());
    for (position, value) in values.iter().enumerate() {
        indices.entry(value.clone()).or_insert(position);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::criteria::{necessary, progressive};
    use crate::core::sentinel::{PROHIBITIVE_COST, UNASSIGNED_INDEX};
    use crate::core::solver::SolverError;

    const EXPENSIVE: i32 = 2000;
    const STANDARD: i32 = 5;

    /// Returns the same assignment whatever the matrix.
    struct FixedSolver(SolverResult);

    impl FixedSolver {
        fn shared(rows: Vec<usize>, cols: Vec<usize>) -> Arc<dyn Solver> {
            Arc::new(Self(SolverResult::new(rows, cols)))
        }
    }

    impl Solver for FixedSolver {
        fn solve(&self, _costs: &[Vec<i32>]) -> Result<SolverResult, SolverError> {
            Ok(self.0.clone())
        }
    }

    fn expensive_diagonal() -> Vec<SharedProgressiveCriterion<i32, i32>> {
        vec![progressive(|mentee: &i32, mentor: &i32| {
            if mentee == mentor {
                EXPENSIVE
            } else {
                STANDARD
            }
        })]
    }

    fn product() -> Vec<SharedProgressiveCriterion<i32, i32>> {
        vec![progressive(|mentee: &i32, mentor: &i32| mentee * mentor)]
    }

    fn assembler(
        mentees: Vec<i32>,
        mentors: Vec<i32>,
        criteria: &[SharedProgressiveCriterion<i32, i32>],
    ) -> MatchAssembler<i32, i32> {
        MatchAssembler::new(Arc::new(mentees), Arc::new(mentors), criteria).unwrap()
    }

    fn sorted(matches: Matches<i32, i32>) -> Vec<(i32, i32, i32)> {
        let mut pairs: Vec<_> = matches.into_iter().map(Match::into_parts).collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_build_with_default_solver() {
        let matches = assembler(vec![0, 1], vec![0, 1], &expensive_diagonal())
            .build()
            .unwrap();

        assert_eq!(sorted(matches), vec![(0, 1, STANDARD), (1, 0, STANDARD)]);
    }

    #[test]
    fn test_build_non_square() {
        let criteria = vec![progressive(|mentee: &i32, mentor: &i32| {
            if mentee == mentor || *mentee == 12 {
                EXPENSIVE
            } else {
                STANDARD
            }
        })];

        let matches = assembler(vec![0, 1, 12], vec![0, 1], &criteria)
            .build()
            .unwrap();

        assert_eq!(sorted(matches), vec![(0, 1, STANDARD), (1, 0, STANDARD)]);
    }

    #[test]
    fn test_build_with_necessary_criteria() {
        let matches = assembler(vec![0, 1], vec![0, 1], &expensive_diagonal())
            .with_necessary_criteria(&[necessary(|mentee: &i32, mentor: &i32| mentee == mentor)])
            .build()
            .unwrap();

        assert_eq!(sorted(matches), vec![(0, 0, EXPENSIVE), (1, 1, EXPENSIVE)]);
    }

    #[test]
    fn test_build_with_stub_solver() {
        let matches = assembler(vec![0, 1], vec![0, 1], &expensive_diagonal())
            .with_solver(FixedSolver::shared(vec![1, 0], vec![1, 0]), UNASSIGNED_INDEX)
            .build()
            .unwrap();

        assert_eq!(sorted(matches), vec![(0, 1, STANDARD), (1, 0, STANDARD)]);
    }

    #[test]
    fn test_build_with_custom_solver_sentinel() {
        let matches = assembler(vec![0, 1], vec![0, 1], &product())
            .with_solver(FixedSolver::shared(vec![0, 1], vec![0, 1]), 27)
            .build()
            .unwrap();

        assert_eq!(sorted(matches), vec![(0, 0, 0), (1, 1, 1)]);
    }

    #[test]
    fn test_build_with_placeholders() {
        let unassigned = 27;

        let matches = assembler(vec![0], vec![0], &product())
            .with_solver(FixedSolver::shared(vec![unassigned], vec![unassigned]), unassigned)
            .with_placeholder_persons(5, -2)
            .build()
            .unwrap();

        assert_eq!(
            sorted(matches),
            vec![(0, -2, UNASSIGNED_SCORE), (5, 0, UNASSIGNED_SCORE)]
        );
    }

    #[test]
    fn test_unassigned_dropped_without_placeholders() {
        let matches = assembler(vec![0, 1], vec![0, 1], &product())
            .with_solver(
                FixedSolver::shared(vec![UNASSIGNED_INDEX, 1], vec![UNASSIGNED_INDEX, 1]),
                UNASSIGNED_INDEX,
            )
            .build()
            .unwrap();

        assert_eq!(sorted(matches), vec![(1, 1, 1)]);
    }

    #[test]
    fn test_selected_prohibited_cell_is_unassigned() {
        let matches = assembler(vec![0, 1], vec![0, 1], &product())
            .with_necessary_criteria(&[necessary(|mentee: &i32, _: &i32| *mentee == 0)])
            .with_solver(FixedSolver::shared(vec![0, 1], vec![0, 1]), UNASSIGNED_INDEX)
            .with_placeholder_persons(-1, -1)
            .build()
            .unwrap();

        assert_eq!(
            sorted(matches),
            vec![(-1, 1, UNASSIGNED_SCORE), (0, 0, 0), (1, -1, UNASSIGNED_SCORE)]
        );
    }

    #[test]
    fn test_invalid_assignment() {
        let result = assembler(vec![0, 1], vec![0, 1], &product())
            .with_solver(FixedSolver::shared(vec![0, 7], vec![0, 1]), UNASSIGNED_INDEX)
            .build();

        assert!(matches!(
            result,
            Err(MatchError::InvalidAssignment {
                side: "mentee",
                index: 1,
                assigned: 7
            })
        ));
    }

    #[test]
    fn test_infeasible_without_placeholders() {
        let result = assembler(vec![0, 1], vec![0, 1, 2], &product())
            .with_necessary_criteria(&[necessary(|mentee: &i32, _: &i32| *mentee != 1)])
            .build();

        assert!(matches!(
            result,
            Err(MatchError::Infeasible {
                side: "mentee",
                index: 1
            })
        ));
    }

    #[test]
    fn test_infeasible_when_candidates_share_one_counterpart() {
        // every mentee can take mentor 0, but only one of them can have it
        let result = assembler(vec![0, 1], vec![0, 1, 2], &product())
            .with_necessary_criteria(&[necessary(|_: &i32, mentor: &i32| *mentor == 0)])
            .build();

        assert!(matches!(
            result,
            Err(MatchError::Infeasible { side: "mentee", .. })
        ));
    }

    #[test]
    fn test_infeasible_on_mentor_side() {
        let result = assembler(vec![0, 1, 2], vec![0, 1], &product())
            .with_necessary_criteria(&[necessary(|mentee: &i32, _: &i32| *mentee == 0)])
            .build();

        assert!(matches!(
            result,
            Err(MatchError::Infeasible { side: "mentor", .. })
        ));
    }

    #[test]
    fn test_shared_counterpart_with_placeholders() {
        let matches = assembler(vec![0, 1], vec![0, 1, 2], &product())
            .with_necessary_criteria(&[necessary(|_: &i32, mentor: &i32| *mentor == 0)])
            .with_placeholder_persons(-1, -1)
            .build()
            .unwrap();

        assert_eq!(matches.mentor_match(&0).map(Match::cost), Some(0));
        let unmatched_mentees = matches
            .iter()
            .filter(|m| *m.mentee() >= 0 && *m.mentor() == -1)
            .count();
        assert_eq!(unmatched_mentees, 1);
    }

    #[test]
    fn test_short_assignment_rejected() {
        let result = assembler(vec![0, 1], vec![0, 1], &product())
            .with_solver(FixedSolver::shared(vec![0, 1], vec![0]), UNASSIGNED_INDEX)
            .with_placeholder_persons(-1, -1)
            .build();

        assert!(matches!(
            result,
            Err(MatchError::AssignmentLength {
                side: "mentor",
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_empty_side() {
        let lonely_mentors = assembler(vec![], vec![1, 2], &product());

        assert!(lonely_mentors.build().unwrap().is_empty());
        let matches = lonely_mentors
            .with_placeholder_persons(-1, -1)
            .build()
            .unwrap();
        assert_eq!(
            sorted(matches),
            vec![(-1, 1, UNASSIGNED_SCORE), (-1, 2, UNASSIGNED_SCORE)]
        );
    }

    #[test]
    fn test_infeasible_candidate_gets_placeholder() {
        let matches = assembler(vec![0, 1], vec![0, 1, 2], &product())
            .with_necessary_criteria(&[necessary(|mentee: &i32, _: &i32| *mentee != 1)])
            .with_placeholder_persons(-1, -1)
            .build()
            .unwrap();

        assert_eq!(
            matches.mentee_match(&1).map(|m| (*m.mentor(), m.cost())),
            Some((-1, UNASSIGNED_SCORE))
        );
        assert_eq!(matches.mentee_match(&0).map(Match::cost), Some(0));
        // mentee 1 and two of the three mentors end up with a placeholder
        assert_eq!(matches.len(), 4);
    }

    #[test]
    fn test_build_is_repeatable() {
        let assembler = assembler(vec![2, 4, 6], vec![5, 10, 15], &product());

        let first = assembler.build().unwrap();
        let second = assembler.build().unwrap();

        assert_eq!(sorted(first), sorted(second));
    }

    #[test]
    fn test_build_partial() {
        let assembler = assembler(vec![0, 1], vec![0, 1], &expensive_diagonal());

        let unassigned_mentor = assembler.build_partial(&[0], &[1, 0]).unwrap();
        let unassigned_mentee = assembler.build_partial(&[0, 1], &[1]).unwrap();

        assert_eq!(sorted(unassigned_mentor), vec![(0, 1, STANDARD)]);
        assert_eq!(sorted(unassigned_mentee), vec![(0, 1, STANDARD)]);
    }

    #[test]
    fn test_build_partial_with_necessary_criteria() {
        let only_two_and_five =
            [necessary(|mentee: &i32, mentor: &i32| *mentee == 2 && *mentor == 5)];

        let matches = assembler(vec![2, 4, 6], vec![5, 10, 15], &product())
            .with_necessary_criteria(&only_two_and_five)
            .with_placeholder_persons(-1, -1)
            .build_partial(&[2, 6], &[10, 5])
            .unwrap();
        assert_eq!(
            sorted(matches),
            vec![(-1, 10, UNASSIGNED_SCORE), (2, 5, 10), (6, -1, UNASSIGNED_SCORE)]
        );

        let matches = assembler(vec![2, 4], vec![5, 10, 15, 20], &product())
            .with_necessary_criteria(&only_two_and_five)
            .with_placeholder_persons(-1, -1)
            .build_partial(&[4, 2], &[5, 20, 15])
            .unwrap();
        assert_eq!(
            sorted(matches),
            vec![
                (-1, 15, UNASSIGNED_SCORE),
                (-1, 20, UNASSIGNED_SCORE),
                (2, 5, 10),
                (4, -1, UNASSIGNED_SCORE)
            ]
        );
    }

    #[test]
    fn test_build_partial_infeasible_without_placeholders() {
        let only_two_and_five =
            [necessary(|mentee: &i32, mentor: &i32| *mentee == 2 && *mentor == 5)];
        let assembler = assembler(vec![2, 4, 6], vec![5, 10, 15], &product())
            .with_necessary_criteria(&only_two_and_five);

        let result = assembler.build_partial(&[2, 6], &[10, 5]);

        assert!(matches!(
            result,
            Err(MatchError::Infeasible {
                side: "mentee",
                index: 2
            })
        ));
        // a fully matched subset is still fine
        let matches = assembler.build_partial(&[2], &[10, 5]).unwrap();
        assert_eq!(sorted(matches), vec![(2, 5, 10)]);
    }

    #[test]
    fn test_build_partial_with_placeholders() {
        let unassigned = UNASSIGNED_INDEX;

        let matches = assembler(vec![2, 4], vec![5, 10], &product())
            .with_solver(FixedSolver::shared(vec![1], vec![unassigned, 0]), unassigned)
            .with_placeholder_persons(5, -2)
            .build_partial(&[2], &[10, 5])
            .unwrap();
        assert_eq!(
            sorted(matches),
            vec![(2, 5, 10), (5, 10, UNASSIGNED_SCORE)]
        );

        let matches = assembler(vec![2, 4], vec![5, 10], &product())
            .with_solver(FixedSolver::shared(vec![unassigned, 0], vec![1]), unassigned)
            .with_placeholder_persons(5, -2)
            .build_partial(&[4, 2], &[5])
            .unwrap();
        assert_eq!(
            sorted(matches),
            vec![(2, 5, 10), (4, -2, UNASSIGNED_SCORE)]
        );
    }

    #[test]
    fn test_build_partial_unknown_candidate() {
        let assembler = assembler(vec![0, 1], vec![0, 1], &product());

        assert!(matches!(
            assembler.build_partial(&[0, 9], &[0]),
            Err(MatchError::UnknownMentee(_))
        ));
    }

    #[test]
    fn test_forbid_and_allow_by_candidate() {
        let mut assembler = assembler(vec![3, 2], vec![5, 6], &product());

        assert!(assembler.forbid_match(&3, &6).unwrap());
        assert!(!assembler.cost_matrix().is_match_allowed(0, 1));
        assert!(!assembler.forbid_match(&3, &6).unwrap());

        assert!(assembler.allow_match(&3, &6).unwrap());
        assert!(assembler.cost_matrix().is_match_allowed(0, 1));
        assert!(matches!(
            assembler.allow_match(&2, &7),
            Err(MatchError::UnknownMentor(_))
        ));
    }

    #[test]
    fn test_forbid_changes_result() {
        let mut assembler = assembler(vec![0, 1], vec![0, 1], &expensive_diagonal());
        assembler.forbid_match(&0, &1).unwrap();

        let matches = assembler.build().unwrap();

        assert_eq!(sorted(matches), vec![(0, 0, EXPENSIVE), (1, 1, EXPENSIVE)]);
    }

    #[test]
    fn test_apply_forbidden_registry() {
        let forbidden = ForbiddenMatches::new();
        forbidden.forbid_match(&0, &1);
        forbidden.forbid_match(&42, &0);
        let mut assembler = assembler(vec![0, 1], vec![0, 1], &expensive_diagonal());

        let applied = assembler.apply_forbidden(&forbidden).unwrap();

        assert_eq!(applied, 1);
        assert!(!assembler.cost_matrix().is_match_allowed(0, 1));
    }

    #[test]
    fn test_build_single_match() {
        let assembler = assembler(vec![0, 1, 2], vec![0, 1, 2], &expensive_diagonal())
            .with_necessary_criteria(&[necessary(|mentee: &i32, mentor: &i32| mentee == mentor)]);

        assert_eq!(
            assembler.build_single_match(&0, &0).unwrap(),
            Match::new(0, 0, EXPENSIVE)
        );
        assert_eq!(
            assembler.build_single_match(&1, &2).unwrap(),
            Match::new(1, 2, PROHIBITIVE_COST)
        );
    }

    #[test]
    fn test_build_single_match_unknown_candidates() {
        let assembler = assembler(vec![0, 1], vec![0, 1], &product());

        assert!(matches!(
            assembler.build_single_match(&0, &1235),
            Err(MatchError::UnknownMentor(_))
        ));
        assert!(matches!(
            assembler.build_single_match(&6291, &1),
            Err(MatchError::UnknownMentee(_))
        ));
        assert!(matches!(
            assembler.build_single_match(&987654, &1235),
            Err(MatchError::UnknownMentee(_))
        ));
    }

    #[test]
    fn test_from_cost_matrix() {
        let matrix = CostMatrix::new(Arc::new(vec![7]), Arc::new(vec![8]), &product()).unwrap();

        let matches = MatchAssembler::from_cost_matrix(matrix).build().unwrap();

        assert_eq!(sorted(matches), vec![(7, 8, 56)]);
    }
}
