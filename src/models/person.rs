use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::criteria::{logical_not_a_or_b, set_distance, CriteriaConfiguration};

/// Weight of one year of distance between the expected and the actual year gap.
pub const YEAR_WEIGHT: i32 = 10;
/// Expected number of years between a mentee and their mentor.
pub const YEAR_GAP: i32 = 10;

/// A registered mentee or mentor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Graduation year
    pub year: i32,
    #[serde(default)]
    pub activities: BTreeSet<String>,
    #[serde(default)]
    pub motivations: BTreeSet<String>,
    /// For a mentee, needs an English speaking mentor; for a mentor, speaks English.
    #[serde(default)]
    pub english: bool,
}

impl Person {
    /// Stand-in used for candidates left without counterpart.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            first_name: name.into(),
            last_name: String::new(),
            year: 0,
            activities: BTreeSet::new(),
            motivations: BTreeSet::new(),
            english: false,
        }
    }

    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Criteria pairing mentees with mentors about ten years older who share their activities
    /// and motivations, and who speak English when the mentee needs it.
    pub fn default_criteria() -> CriteriaConfiguration<Person, Person> {
        CriteriaConfiguration::new("Default criteria")
            .with_progressive(|mentee: &Person, mentor: &Person| year_distance(mentee, mentor))
            .with_progressive(|mentee: &Person, mentor: &Person| {
                set_distance(&mentee.activities, &mentor.activities)
            })
            .with_progressive(|mentee: &Person, mentor: &Person| {
                set_distance(&mentee.motivations, &mentor.motivations)
            })
            .with_necessary(|mentee: &Person, mentor: &Person| {
                logical_not_a_or_b(mentee.english, mentor.english)
            })
    }
}

/// Weighted distance between the actual and the expected year gap, saturating at `i32::MAX`.
fn year_distance(mentee: &Person, mentor: &Person) -> i32 {
    let gap = i64::from(mentee.year) - i64::from(YEAR_GAP) - i64::from(mentor.year);
    i32::try_from(i64::from(YEAR_WEIGHT) * gap.abs()).unwrap_or(i32::MAX)
}
