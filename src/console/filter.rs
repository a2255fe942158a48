use crate::models::{Person, YearLevel};

use super::catalog::ALL_OPTION;

/// Year-level and course filters over the loaded collection. `None` means
/// the "ALL" option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub year_level: Option<YearLevel>,
    pub course_id: Option<i64>,
}

impl RecordFilter {
    pub fn matches(&self, person: &Person) -> bool {
        let year_ok = self
            .year_level
            .is_none_or(|year| person.year_level == Some(year));
        let course_ok = self
            .course_id
            .is_none_or(|course| person.course_id == Some(course));
        year_ok && course_ok
    }

    pub fn apply<'a>(&self, people: &'a [Person]) -> Vec<&'a Person> {
        people.iter().filter(|person| self.matches(person)).collect()
    }

    /// Sets the year filter from a dropdown value (`ALL` or a level).
    pub fn select_year(&mut self, value: &str) {
        self.year_level = if value == ALL_OPTION {
            None
        } else {
            YearLevel::parse(value)
        };
    }

    /// Sets the course filter from a dropdown value (`ALL` or a course id).
    pub fn select_course(&mut self, value: &str) {
        self.course_id = if value == ALL_OPTION {
            None
        } else {
            value.parse().ok()
        };
    }
}
