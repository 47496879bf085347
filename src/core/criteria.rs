use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Scoring rule contributing an additive cost to a (mentee, mentor) pair.
///
/// The score must be zero or positive: the higher it is, the less viable the pairing. A
/// criterion should be stable, returning the same score for the same pair as long as both
/// candidates are unchanged. It need not be symmetrical.
pub trait ProgressiveCriterion<Mentee, Mentor>: Send + Sync {
    fn score(&self, mentee: &Mentee, mentor: &Mentor) -> i32;
}

/// Boolean rule that must hold for a (mentee, mentor) pair to be viable.
pub trait NecessaryCriterion<Mentee, Mentor>: Send + Sync {
    fn test(&self, mentee: &Mentee, mentor: &Mentor) -> bool;
}

impl<Mentee, Mentor, F> ProgressiveCriterion<Mentee, Mentor> for F
where
    F: Fn(&Mentee, &Mentor) -> i32 + Send + Sync,
{
    #[inline]
    fn score(&self, mentee: &Mentee, mentor: &Mentor) -> i32 {
        self(mentee, mentor)
    }
}

impl<Mentee, Mentor, F> NecessaryCriterion<Mentee, Mentor> for F
where
    F: Fn(&Mentee, &Mentor) -> bool + Send + Sync,
{
    #[inline]
    fn test(&self, mentee: &Mentee, mentor: &Mentor) -> bool {
        self(mentee, mentor)
    }
}

pub type SharedProgressiveCriterion<Mentee, Mentor> = Arc<dyn ProgressiveCriterion<Mentee, Mentor>>;
pub type SharedNecessaryCriterion<Mentee, Mentor> = Arc<dyn NecessaryCriterion<Mentee, Mentor>>;

/// Wrap a closure as a shareable progressive criterion.
pub fn progressive<Mentee, Mentor, F>(criterion: F) -> SharedProgressiveCriterion<Mentee, Mentor>
where
    F: Fn(&Mentee, &Mentor) -> i32 + Send + Sync + 'static,
{
    Arc::new(criterion)
}

/// Wrap a closure as a shareable necessary criterion.
pub fn necessary<Mentee, Mentor, F>(criterion: F) -> SharedNecessaryCriterion<Mentee, Mentor>
where
    F: Fn(&Mentee, &Mentor) -> bool + Send + Sync + 'static,
{
    Arc::new(criterion)
}

/// Named set of criteria used to pair one mentee type with one mentor type.
pub struct CriteriaConfiguration<Mentee, Mentor> {
    name: String,
    progressive: Vec<SharedProgressiveCriterion<Mentee, Mentor>>,
    necessary: Vec<SharedNecessaryCriterion<Mentee, Mentor>>,
}

impl<Mentee, Mentor> CriteriaConfiguration<Mentee, Mentor> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            progressive: Vec::new(),
            necessary: Vec::new(),
        }
    }

    pub fn with_progressive<F>(mut self, criterion: F) -> Self
    where
        F: Fn(&Mentee, &Mentor) -> i32 + Send + Sync + 'static,
    {
        self.progressive.push(Arc::new(criterion));
        self
    }

    pub fn with_necessary<F>(mut self, criterion: F) -> Self
    where
        F: Fn(&Mentee, &Mentor) -> bool + Send + Sync + 'static,
    {
        self.necessary.push(Arc::new(criterion));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn progressive_criteria(&self) -> &[SharedProgressiveCriterion<Mentee, Mentor>] {
        &self.progressive
    }

    pub fn necessary_criteria(&self) -> &[SharedNecessaryCriterion<Mentee, Mentor>] {
        &self.necessary
    }
}

impl<Mentee, Mentor> Clone for CriteriaConfiguration<Mentee, Mentor> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            progressive: self.progressive.clone(),
            necessary: self.necessary.clone(),
        }
    }
}

impl<Mentee, Mentor> fmt::Debug for CriteriaConfiguration<Mentee, Mentor> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriteriaConfiguration")
            .field("name", &self.name)
            .field("progressive", &self.progressive.len())
            .field("necessary", &self.necessary.len())
            .finish()
    }
}

/// Multiplier applied by [`set_distance`].
pub const SET_DISTANCE_MULTIPLIER: i32 = 100;

/// Material implication: `false` only when `a` holds and `b` does not.
///
/// Typical use is a necessary criterion such as "a mentee requiring English needs an English
/// speaking mentor".
#[inline]
pub fn logical_not_a_or_b(a: bool, b: bool) -> bool {
    !a || b
}

/// Distance between two sets: zero for equal sets, growing with the number of values found in
/// only one of them and shrinking with the number of shared values.
///
/// Symmetric and non-negative. The triangle inequality is not guaranteed.
pub fn set_distance<E: Ord>(first: &BTreeSet<E>, second: &BTreeSet<E>) -> i32 {
    let common = first.intersection(second).count();
    let not_common = first.len() + second.len() - 2 * common;
    let distance = SET_DISTANCE_MULTIPLIER as usize * not_common / (common + 1);
    i32::try_from(distance).unwrap_or(i32::MAX)
}
