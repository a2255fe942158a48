use std::collections::BTreeMap;

use crate::models::{Course, Person, YearLevel};

pub const ALL_OPTION: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub(crate) fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Course lookup shared by the pages that need it. Passed explicitly to each
/// view rather than read from ambient state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, course_id: i64) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == course_id)
    }

    pub fn department_for(&self, course_id: i64) -> Option<i64> {
        self.get(course_id).map(|course| course.department_id)
    }

    pub fn code_for(&self, course_id: i64) -> Option<&str> {
        self.get(course_id).map(|course| course.code.as_str())
    }

    pub fn course_options(&self) -> Vec<DropdownOption> {
        self.courses
            .iter()
            .map(|course| DropdownOption::new(course.id.to_string(), course.code.clone()))
            .collect()
    }

    pub fn course_filter_options(&self) -> Vec<DropdownOption> {
        let mut options = vec![DropdownOption::new(ALL_OPTION, "All Courses")];
        options.extend(self.course_options());
        options
    }
}

pub fn year_options() -> Vec<DropdownOption> {
    YearLevel::ALL
        .into_iter()
        .map(|level| DropdownOption::new(level.as_str(), level.label()))
        .collect()
}

pub fn year_filter_options() -> Vec<DropdownOption> {
    let mut options = vec![DropdownOption::new(ALL_OPTION, "All Years")];
    options.extend(year_options());
    options
}

/// One entry of the programs page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSummary {
    pub course_id: i64,
    pub code: String,
    pub coach_count: usize,
}

/// Lists every course with the number of coaches attached to it.
pub fn program_summaries(catalog: &CourseCatalog, coaches: &[Person]) -> Vec<ProgramSummary> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for course_id in coaches.iter().filter_map(|coach| coach.course_id) {
        *counts.entry(course_id).or_default() += 1;
    }

    catalog
        .courses()
        .iter()
        .map(|course| ProgramSummary {
            course_id: course.id,
            code: course.code.clone(),
            coach_count: counts.get(&course.id).copied().unwrap_or(0),
        })
        .collect()
}
