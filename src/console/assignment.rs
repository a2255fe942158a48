use crate::models::{AssignmentMode, AssignmentRequest, Person};
use crate::validation::{FieldErrors, Validate};

use super::catalog::DropdownOption;
use super::modal::ModalState;
use super::table::{Selection, TableEvent, TablePage, TableView};

pub const ASSIGNMENT_PAGE_SIZE: usize = 5;

/// The "Assign Coach" / "Transfer Students" modal.
///
/// Holds its own copy of the students chosen in the main table and its own
/// selection over them, so unchecking a row here leaves the main table alone.
#[derive(Debug, Clone)]
pub struct AssignmentFlow {
    mode: AssignmentMode,
    students: Vec<Person>,
    table: TableView,
    selection: Selection,
    coach_id: Option<i64>,
    modal: ModalState,
}

impl AssignmentFlow {
    /// Opens the flow over `students`, all of them checked. Returns `None`
    /// when nothing was selected.
    pub fn open(mode: AssignmentMode, students: Vec<Person>) -> Option<Self> {
        if students.is_empty() {
            return None;
        }

        let mut selection = Selection::new();
        selection.toggle_all(students.iter().map(|student| student.id));
        let mut modal = ModalState::default();
        modal.open();

        Some(Self {
            mode,
            students,
            table: TableView::new(ASSIGNMENT_PAGE_SIZE),
            selection,
            coach_id: None,
            modal,
        })
    }

    pub fn mode(&self) -> AssignmentMode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn students(&self) -> &[Person] {
        &self.students
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub(crate) fn modal_mut(&mut self) -> &mut ModalState {
        &mut self.modal
    }

    pub fn page(&self) -> TablePage<'_, Person> {
        self.table.render(&self.students, &self.selection)
    }

    pub fn toggle_row(&mut self, id: i64) -> TableEvent {
        self.table.toggle_row(&mut self.selection, id)
    }

    pub fn toggle_all(&mut self) -> TableEvent {
        self.table.toggle_all(&mut self.selection, &self.students)
    }

    pub fn next_page(&mut self) {
        self.table.next_page(self.students.len());
    }

    pub fn prev_page(&mut self) {
        self.table.prev_page(self.students.len());
    }

    pub fn coach_id(&self) -> Option<i64> {
        self.coach_id
    }

    /// Sets the coach from a dropdown value; anything unparsable clears it.
    pub fn select_coach(&mut self, value: &str) {
        self.coach_id = value.parse().ok();
    }

    pub fn coach_options(coaches: &[Person]) -> Vec<DropdownOption> {
        coaches
            .iter()
            .map(|coach| DropdownOption::new(coach.id.to_string(), coach.full_name()))
            .collect()
    }

    pub fn request(&self) -> Result<AssignmentRequest, FieldErrors> {
        let request = AssignmentRequest {
            student_ids: self.selection.ids().iter().copied().collect(),
            coach_id: self.coach_id.unwrap_or_default(),
            mode: self.mode,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn success_message(&self, processed: usize) -> String {
        format!("{} student(s) processed. (Mode: {})", processed, self.title())
    }
}
