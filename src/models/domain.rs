use std::collections::HashMap;
use std::hash::Hash;

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;

/// An assignment of one mentor to one mentee, with its cost.
///
/// Equality and hashing cover all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
pub struct Match<Mentee, Mentor> {
    mentee: Mentee,
    mentor: Mentor,
    cost: i32,
}

impl<Mentee, Mentor> Match<Mentee, Mentor> {
    pub fn new(mentee: Mentee, mentor: Mentor, cost: i32) -> Self {
        Self {
            mentee,
            mentor,
            cost,
        }
    }

    pub fn mentee(&self) -> &Mentee {
        &self.mentee
    }

    pub fn mentor(&self) -> &Mentor {
        &self.mentor
    }

    pub fn cost(&self) -> i32 {
        self.cost
    }

    pub fn into_parts(self) -> (Mentee, Mentor, i32) {
        (self.mentee, self.mentor, self.cost)
    }
}

/// Collection of matches, in assembly order, with lookups by candidate.
///
/// A candidate found in several matches (typically a placeholder) resolves to the first one.
#[derive(Debug, Clone)]
pub struct Matches<Mentee, Mentor> {
    matches: Vec<Match<Mentee, Mentor>>,
    by_mentee: HashMap<Mentee, usize>,
    by_mentor: HashMap<Mentor, usize>,
}

impl<Mentee, Mentor> Matches<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone,
    Mentor: Eq + Hash + Clone,
{
    pub fn new(matches: Vec<Match<Mentee, Mentor>>) -> Self {
        let mut by_mentee = HashMap::with_capacity(matches.len());
        let mut by_mentor = HashMap::with_capacity(matches.len());
        for (position, m) in matches.iter().enumerate() {
            by_mentee.entry(m.mentee.clone()).or_insert(position);
            by_mentor.entry(m.mentor.clone()).or_insert(position);
        }
        Self {
            matches,
            by_mentee,
            by_mentor,
        }
    }

    pub fn mentee_match(&self, mentee: &Mentee) -> Option<&Match<Mentee, Mentor>> {
        self.by_mentee.get(mentee).map(|&position| &self.matches[position])
    }

    pub fn mentor_match(&self, mentor: &Mentor) -> Option<&Match<Mentee, Mentor>> {
        self.by_mentor.get(mentor).map(|&position| &self.matches[position])
    }

    pub fn is_mentee(&self, mentee: &Mentee) -> bool {
        self.by_mentee.contains_key(mentee)
    }

    pub fn is_mentor(&self, mentor: &Mentor) -> bool {
        self.by_mentor.contains_key(mentor)
    }

    /// Whether this exact match, cost included, is part of the collection.
    pub fn contains(&self, m: &Match<Mentee, Mentor>) -> bool {
        self.matches.contains(m)
    }
}

impl<Mentee, Mentor> Matches<Mentee, Mentor> {
    pub fn iter(&self) -> std::slice::Iter<'_, Match<Mentee, Mentor>> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn as_slice(&self) -> &[Match<Mentee, Mentor>] {
        &self.matches
    }

    /// Sum of the costs, in `i64` so prohibitive costs cannot overflow.
    pub fn total_cost(&self) -> i64 {
        self.matches.iter().map(|m| i64::from(m.cost)).sum()
    }
}

impl<Mentee, Mentor> IntoIterator for Matches<Mentee, Mentor> {
    type Item = Match<Mentee, Mentor>;
    type IntoIter = std::vec::IntoIter<Match<Mentee, Mentor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a, Mentee, Mentor> IntoIterator for &'a Matches<Mentee, Mentor> {
    type Item = &'a Match<Mentee, Mentor>;
    type IntoIter = std::slice::Iter<'a, Match<Mentee, Mentor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl<Mentee, Mentor> FromIterator<Match<Mentee, Mentor>> for Matches<Mentee, Mentor>
where
    Mentee: Eq + Hash + Clone,
    Mentor: Eq + Hash + Clone,
{
    fn from_iter<I: IntoIterator<Item = Match<Mentee, Mentor>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Serialized as a plain sequence of matches.
impl<Mentee, Mentor> Serialize for Matches<Mentee, Mentor>
where
    Mentee: Serialize,
    Mentor: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.matches)
    }
}
