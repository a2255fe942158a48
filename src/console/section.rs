use std::collections::BTreeSet;
use std::time::Instant;

use reqwest::StatusCode;
use tracing::{info, warn};

use crate::models::{AssignmentMode, Person, PersonKind, YearLevel};
use crate::validation::Validate;

use super::alert::{Alert, AlertSlot};
use super::api::{ConsoleApi, ConsoleError};
use super::assignment::AssignmentFlow;
use super::catalog::CourseCatalog;
use super::filter::RecordFilter;
use super::form::{CreateForm, EditDraft, created_person};
use super::modal::{ModalPhase, ModalState};
use super::store::{FetchTicket, ResourceStore};
use super::table::{Selection, TableEvent, TablePage, TableView};

pub const PAGE_SIZE: usize = 10;

/// A list request started by [`PersonSection::begin_refresh`] and friends.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    ticket: FetchTicket,
    kind: PersonKind,
    query: Option<String>,
}

impl PendingFetch {
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub async fn run(self, api: &dyn ConsoleApi) -> FetchOutcome {
        let result = api.list_people(self.kind, self.query.as_deref()).await;
        FetchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// The result of a [`PendingFetch`], tagged with the fetch it belongs to.
#[derive(Debug)]
pub struct FetchOutcome {
    ticket: FetchTicket,
    result: Result<Vec<Person>, ConsoleError>,
}

/// One coaches or students page: the loaded collection, its filters and
/// table, and the create, view/edit and assignment modals.
#[derive(Debug)]
pub struct PersonSection {
    kind: PersonKind,
    store: ResourceStore<Person>,
    filter: RecordFilter,
    query: String,
    table: TableView,
    selection: Selection,
    create_modal: ModalState,
    create_form: CreateForm,
    view_modal: ModalState,
    draft: Option<EditDraft>,
    assignment: Option<AssignmentFlow>,
    alert: AlertSlot,
}

impl PersonSection {
    pub fn new(kind: PersonKind) -> Self {
        Self {
            kind,
            store: ResourceStore::new(),
            filter: RecordFilter::default(),
            query: String::new(),
            table: TableView::new(PAGE_SIZE),
            selection: Selection::new(),
            create_modal: ModalState::default(),
            create_form: CreateForm::default(),
            view_modal: ModalState::default(),
            draft: None,
            assignment: None,
            alert: AlertSlot::default(),
        }
    }

    pub fn kind(&self) -> PersonKind {
        self.kind
    }

    pub fn store(&self) -> &ResourceStore<Person> {
        &self.store
    }

    // Fetching
    //
    // `refresh`, `search` and `clear_search` hold the section for the whole
    // request. A caller that must keep the page live while a request is in
    // flight uses `begin_*`, runs the returned `PendingFetch` on its own and
    // hands the outcome to `finish_fetch`; superseded outcomes are dropped.

    pub fn begin_refresh(&mut self) -> PendingFetch {
        PendingFetch {
            ticket: self.store.begin_fetch(),
            kind: self.kind,
            query: Some(self.query.clone()).filter(|q| !q.is_empty()),
        }
    }

    pub fn begin_search(&mut self, text: &str) -> PendingFetch {
        self.query = text.trim().to_string();
        self.table.reset_page();
        self.begin_refresh()
    }

    pub fn begin_clear_search(&mut self) -> PendingFetch {
        self.begin_search("")
    }

    /// Applies a finished fetch. Returns `false` when a newer fetch was
    /// started in the meantime and this result was discarded.
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome { ticket, result } = outcome;
        if let Err(err) = &result {
            warn!("failed to fetch {}: {}", self.kind.plural(), err);
        }

        let applied = self.store.complete_fetch(ticket, result);
        if applied {
            self.prune_selection();
        }
        applied
    }

    /// Refetches the collection with the current search text.
    pub async fn refresh(&mut self, api: &dyn ConsoleApi) -> bool {
        let outcome = self.begin_refresh().run(api).await;
        self.finish_fetch(outcome)
    }

    pub async fn search(&mut self, api: &dyn ConsoleApi, text: &str) -> bool {
        let outcome = self.begin_search(text).run(api).await;
        self.finish_fetch(outcome)
    }

    pub async fn clear_search(&mut self, api: &dyn ConsoleApi) -> bool {
        let outcome = self.begin_clear_search().run(api).await;
        self.finish_fetch(outcome)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    // Filters and table

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn select_year(&mut self, value: &str) {
        self.filter.select_year(value);
        self.table.reset_page();
        self.prune_selection();
    }

    pub fn select_course(&mut self, value: &str) {
        self.filter.select_course(value);
        self.table.reset_page();
        self.prune_selection();
    }

    /// Drops selected ids that are no longer on screen, so bulk actions and
    /// the header checkbox only ever concern visible rows.
    fn prune_selection(&mut self) {
        let visible: BTreeSet<i64> = self.visible().iter().map(|person| person.id).collect();
        self.selection.retain(|id| visible.contains(&id));
    }

    /// Records passing the year and course filters.
    pub fn visible(&self) -> Vec<&Person> {
        self.filter.apply(self.store.records())
    }

    pub fn page(&self) -> TablePage<'_, Person> {
        self.table.render(self.visible(), &self.selection)
    }

    pub fn toggle_sort(&mut self) {
        self.table.toggle_sort();
    }

    pub fn next_page(&mut self) {
        let total = self.visible().len();
        self.table.next_page(total);
    }

    pub fn prev_page(&mut self) {
        let total = self.visible().len();
        self.table.prev_page(total);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle_row(&mut self, id: i64) -> TableEvent {
        self.table.toggle_row(&mut self.selection, id)
    }

    pub fn toggle_all(&mut self) -> TableEvent {
        let ids: Vec<i64> = self.visible().iter().map(|person| person.id).collect();
        self.selection.toggle_all(ids);
        TableEvent::SelectionChanged(self.selection.ids().clone())
    }

    /// Hides the selected rows from this page. The backend has no delete
    /// endpoint, so they come back on the next fetch.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        self.prune_selection();
        let removed = self.store.remove_local(self.selection.ids());
        self.selection.clear();
        removed
    }

    // Create modal

    /// Opens a blank form, preset to the first year level and first course.
    pub fn open_create(&mut self, catalog: &CourseCatalog) {
        self.create_form = CreateForm::preset(
            Some(YearLevel::First),
            catalog.courses().first().map(|course| course.id),
        );
        self.create_modal.open();
    }

    pub fn create_modal(&self) -> &ModalState {
        &self.create_modal
    }

    pub fn create_form(&self) -> &CreateForm {
        &self.create_form
    }

    /// The form while it accepts input.
    pub fn create_form_mut(&mut self) -> Option<&mut CreateForm> {
        (self.create_modal.phase() == ModalPhase::Open).then_some(&mut self.create_form)
    }

    pub fn close_create(&mut self) {
        self.create_modal.close();
    }

    pub async fn submit_create(&mut self, api: &dyn ConsoleApi, catalog: &CourseCatalog) -> bool {
        if self.create_modal.phase() != ModalPhase::Open {
            return false;
        }

        let payload = match self.create_form.validate(self.kind, catalog) {
            Ok(payload) => payload,
            Err(errors) => {
                self.create_form.set_errors(errors);
                return false;
            }
        };
        self.create_form.clear_errors();

        if !self.create_modal.begin_submit() {
            return false;
        }

        match api.create_person(self.kind, &payload).await {
            Ok(created) => {
                info!("created {} #{}", self.kind.label(), created.id);
                self.store.append(created_person(payload, created, self.kind));
                self.create_modal.close();
                self.alert.raise(Alert::success(format!(
                    "{} added successfully",
                    self.kind.label()
                )));
                true
            }
            Err(err) => {
                self.create_modal.submit_failed();
                self.alert.raise(Alert::error(failure_message(&err)));
                false
            }
        }
    }

    // View/edit modal

    pub fn open_view(&mut self, id: i64) -> bool {
        match self.store.get(id) {
            Some(person) => {
                self.draft = Some(EditDraft::new(person.clone()));
                self.view_modal.open();
                true
            }
            None => false,
        }
    }

    pub fn view_modal(&self) -> &ModalState {
        &self.view_modal
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// The draft while the view is unlocked for editing.
    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        if self.view_modal.is_editing() {
            self.draft.as_mut()
        } else {
            None
        }
    }

    pub fn begin_edit(&mut self) -> bool {
        self.draft.is_some() && self.view_modal.begin_edit()
    }

    pub fn can_save(&self) -> bool {
        self.view_modal.is_editing() && self.draft.as_ref().is_some_and(EditDraft::has_changes)
    }

    /// Sends the draft's change-set. An empty change-set closes the modal
    /// without a request.
    pub async fn save_edit(&mut self, api: &dyn ConsoleApi, catalog: &CourseCatalog) -> bool {
        if !self.view_modal.is_editing() {
            return false;
        }
        let Some(draft) = &self.draft else {
            return false;
        };

        let id = draft.id();
        let patch = draft.diff(catalog);
        if patch.is_empty() {
            self.close_view();
            return true;
        }
        if let Err(errors) = patch.validate() {
            self.alert.raise(Alert::error(errors.summary()));
            return false;
        }

        if !self.view_modal.begin_submit() {
            return false;
        }

        match api.update_person(self.kind, id, &patch).await {
            Ok(_) => {
                self.store.apply_local_change(id, &patch);
                self.close_view();
                self.alert.raise(Alert::success(format!(
                    "{} updated successfully",
                    self.kind.label()
                )));
                true
            }
            Err(err) => {
                self.view_modal.submit_failed();
                self.alert.raise(Alert::error(failure_message(&err)));
                false
            }
        }
    }

    /// Drops unsaved edits and locks the view again.
    pub fn cancel_edit(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.reset();
        }
        self.view_modal.end_edit();
    }

    pub fn close_view(&mut self) {
        self.view_modal.close();
        self.draft = None;
    }

    // Assignment modal

    /// Opens the assignment modal over the selected rows. Does nothing when
    /// no row is selected.
    pub fn open_assignment(&mut self, mode: AssignmentMode) -> bool {
        let students: Vec<Person> = self
            .visible()
            .into_iter()
            .filter(|person| self.selection.contains(person.id))
            .cloned()
            .collect();
        self.assignment = AssignmentFlow::open(mode, students);
        self.assignment.is_some()
    }

    pub fn assignment(&self) -> Option<&AssignmentFlow> {
        self.assignment.as_ref()
    }

    pub fn assignment_mut(&mut self) -> Option<&mut AssignmentFlow> {
        self.assignment.as_mut()
    }

    pub fn close_assignment(&mut self) {
        self.assignment = None;
    }

    pub async fn confirm_assignment(&mut self, api: &dyn ConsoleApi) -> bool {
        let Some(flow) = self.assignment.as_mut() else {
            return false;
        };

        let request = match flow.request() {
            Ok(request) => request,
            Err(errors) => {
                self.alert.raise(Alert::error(errors.summary()));
                return false;
            }
        };
        if !flow.modal_mut().begin_submit() {
            return false;
        }

        match api.assign_students(&request).await {
            Ok(_) => {
                let message = flow.success_message(request.student_ids.len());
                self.assignment = None;
                self.selection.clear();
                self.alert.raise(Alert::success(message));
                true
            }
            Err(err) => {
                flow.modal_mut().submit_failed();
                self.alert.raise(Alert::error(failure_message(&err)));
                false
            }
        }
    }

    // Alert

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.current()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert.dismiss();
    }

    pub fn expire_alert(&mut self, now: Instant) {
        self.alert.expire(now);
    }
}

fn failure_message(err: &ConsoleError) -> String {
    match err.status() {
        Some(StatusCode::CONFLICT) => format!("Conflict Error: {}", err),
        _ => err.to_string(),
    }
}
