use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use crate::core::error::MatchError;

/// Anything that can record operator-forbidden cells, addressed by index.
pub trait ForbiddenMatchTarget {
    fn forbid_match(&mut self, mentee_index: usize, mentor_index: usize) -> Result<bool, MatchError>;

    fn allow_match(&mut self, mentee_index: usize, mentor_index: usize) -> Result<bool, MatchError>;

    fn clear_specifically_forbidden_matches(&mut self);
}

enum Action<Mentee, Mentor> {
    Forbid(Mentee, Mentor),
    Allow(Mentee, Mentor),
}

struct State<Mentee, Mentor> {
    mentees_to_mentors: HashMap<Mentee, HashSet<Mentor>>,
    /// Changes since the last `apply` or `apply_from_last_state`.
    actions: Vec<Action<Mentee, Mentor>>,
}

/// Ledger of the matches an operator forbade, keyed by the candidates themselves.
///
/// The registry outlives any single cost matrix: it is projected onto a matrix on demand with
/// [`apply`](Self::apply), using caller-supplied lookups to turn candidates into indices.
///
/// Thread-safe; every operation takes an internal lock.
pub struct ForbiddenMatches<Mentee, Mentor> {
    state: Mutex<State<Mentee, Mentor>>,
}

impl<Mentee, Mentor> ForbiddenMatches<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone,
    Mentor: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                mentees_to_mentors: HashMap::new(),
                actions: Vec::new(),
            }),
        }
    }

    /// Forbid a match. Returns `true` if the match was not already forbidden.
    pub fn forbid_match(&self, mentee: &Mentee, mentor: &Mentor) -> bool {
        let mut state = self.lock();
        let changed = state
            .mentees_to_mentors
            .entry(mentee.clone())
            .or_default()
            .insert(mentor.clone());
        if changed {
            state
                .actions
                .push(Action::Forbid(mentee.clone(), mentor.clone()));
        }
        changed
    }

    /// Allow a match. Returns `true` if the match was forbidden.
    pub fn allow_match(&self, mentee: &Mentee, mentor: &Mentor) -> bool {
        let mut state = self.lock();
        let Some(mentors) = state.mentees_to_mentors.get_mut(mentee) else {
            return false;
        };
        let changed = mentors.remove(mentor);
        if mentors.is_empty() {
            state.mentees_to_mentors.remove(mentee);
        }
        if changed {
            state
                .actions
                .push(Action::Allow(mentee.clone(), mentor.clone()));
        }
        changed
    }

    /// Allow every forbidden match.
    pub fn clear(&self) {
        let mut state = self.lock();
        let drained: Vec<(Mentee, HashSet<Mentor>)> = state.mentees_to_mentors.drain().collect();
        for (mentee, mentors) in drained {
            for mentor in mentors {
                state.actions.push(Action::Allow(mentee.clone(), mentor));
            }
        }
    }

    pub fn is_forbidden(&self, mentee: &Mentee, mentor: &Mentor) -> bool {
        self.lock()
            .mentees_to_mentors
            .get(mentee)
            .is_some_and(|mentors| mentors.contains(mentor))
    }

    /// Number of forbidden pairs.
    pub fn len(&self) -> usize {
        self.lock().mentees_to_mentors.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().mentees_to_mentors.is_empty()
    }

    /// Copy of the forbidden pairs, in no particular order.
    pub fn forbidden_pairs(&self) -> Vec<(Mentee, Mentor)> {
        self.lock()
            .mentees_to_mentors
            .iter()
            .flat_map(|(mentee, mentors)| {
                mentors
                    .iter()
                    .map(move |mentor| (mentee.clone(), mentor.clone()))
            })
            .collect()
    }

    /// Project the current state onto `target`: its operator forbids are cleared, then every
    /// forbidden pair is forbidden again. Repeated calls re-assert the same cells.
    ///
    /// Pairs whose candidates the lookups cannot resolve are skipped. Returns the number of
    /// cells forbidden.
    pub fn apply<T, FM, FR>(
        &self,
        target: &mut T,
        mentee_index: FM,
        mentor_index: FR,
    ) -> Result<usize, MatchError>
    where
        T: ForbiddenMatchTarget + ?Sized,
        FM: Fn(&Mentee) -> Option<usize>,
        FR: Fn(&Mentor) -> Option<usize>,
    {
        let mut state = self.lock();
        target.clear_specifically_forbidden_matches();
        let mut applied = 0usize;
        for (mentee, mentors) in &state.mentees_to_mentors {
            let Some(i) = mentee_index(mentee) else {
                tracing::debug!("Forbidden mentee not found in target, skipped");
                continue;
            };
            for mentor in mentors {
                match mentor_index(mentor) {
                    Some(j) => {
                        target.forbid_match(i, j)?;
                        applied += 1;
                    }
                    None => tracing::debug!("Forbidden mentor not found in target, skipped"),
                }
            }
        }
        state.actions.clear();
        tracing::debug!(applied, "Forbidden matches applied");
        Ok(applied)
    }

    /// Replay on `target` only the forbids and allows recorded since the last call to
    /// [`apply`](Self::apply) or to this method.
    ///
    /// Meant for a single target that was first initialised with `apply`.
    pub fn apply_from_last_state<T, FM, FR>(
        &self,
        target: &mut T,
        mentee_index: FM,
        mentor_index: FR,
    ) -> Result<usize, MatchError>
    where
        T: ForbiddenMatchTarget + ?Sized,
        FM: Fn(&Mentee) -> Option<usize>,
        FR: Fn(&Mentor) -> Option<usize>,
    {
        let mut state = self.lock();
        let mut replayed = 0usize;
        for action in state.actions.drain(..) {
            let (mentee, mentor, forbid) = match &action {
                Action::Forbid(mentee, mentor) => (mentee, mentor, true),
                Action::Allow(mentee, mentor) => (mentee, mentor, false),
            };
            let (Some(i), Some(j)) = (mentee_index(mentee), mentor_index(mentor)) else {
                continue;
            };
            if forbid {
                target.forbid_match(i, j)?;
            } else {
                target.allow_match(i, j)?;
            }
            replayed += 1;
        }
        Ok(replayed)
    }

    fn lock(&self) -> MutexGuard<'_, State<Mentee, Mentor>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<Mentee, Mentor> FromIterator<(Mentee, Mentor)> for ForbiddenMatches<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone,
    Mentor: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = (Mentee, Mentor)>>(pairs: I) -> Self {
        let forbidden = Self::new();
        for (mentee, mentor) in pairs {
            forbidden.forbid_match(&mentee, &mentor);
        }
        forbidden
    }
}

impl<Mentee, Mentor> Default for ForbiddenMatches<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone,
    Mentor: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
