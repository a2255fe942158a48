use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ccms::{
    console::{
        ConsoleApi, ConsoleError, CourseCatalog, CreatedRecord, ModalPhase, PersonField,
        PersonSection, ProfileEditor, ProfileField, ResourceStore, TableEvent,
    },
    models::{
        AssignmentMode, AssignmentRequest, Course, NewPersonPayload, Person, PersonKind,
        PersonPatch, Profile, ProfileUpdate, Role, YearLevel,
    },
};
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn person(id: i64, year: YearLevel, course_id: i64) -> Person {
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    Person {
        id,
        unique_id: format!("S-{id:03}"),
        username: format!("S-{id:03}"),
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        email: format!("s{id}@example.edu"),
        address: "Manila".to_string(),
        bio: None,
        contact_number: None,
        year_level: Some(year),
        course_id: Some(course_id),
        department_id: Some(course_id * 10),
        role: Role::Student,
        created_at: at,
        updated_at: at,
    }
}

fn catalog() -> CourseCatalog {
    CourseCatalog::new(vec![
        Course {
            id: 1,
            code: "BSCS".to_string(),
            department_id: 10,
        },
        Course {
            id: 2,
            code: "BSIT".to_string(),
            department_id: 20,
        },
    ])
}

/// Console API double counting requests and recording what was sent.
#[derive(Default)]
struct FakeApi {
    people: Vec<Person>,
    reject: Option<(StatusCode, String)>,
    requests: AtomicUsize,
    patches: Mutex<Vec<(i64, PersonPatch)>>,
    profile_updates: Mutex<Vec<ProfileUpdate>>,
    assignments: Mutex<Vec<AssignmentRequest>>,
    queries: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    fn with_people(people: Vec<Person>) -> Self {
        Self {
            people,
            ..Self::default()
        }
    }

    fn hit(&self) -> Result<(), ConsoleError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.reject {
            Some((status, message)) => Err(ConsoleError::Rejected {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConsoleApi for FakeApi {
    async fn profile(&self) -> Result<Profile, ConsoleError> {
        self.hit()?;
        Ok(Profile {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            role: Role::Admin,
            email: Some("ada@example.edu".to_string()),
            contact_number: None,
            department: Some("CCS".to_string()),
            address: None,
        })
    }

    async fn update_profile(&self, _id: i64, update: &ProfileUpdate) -> Result<Value, ConsoleError> {
        self.hit()?;
        self.profile_updates.lock().unwrap().push(update.clone());
        Ok(json!({}))
    }

    async fn courses(&self) -> Result<Vec<Course>, ConsoleError> {
        self.hit()?;
        Ok(catalog().courses().to_vec())
    }

    async fn list_people(
        &self,
        _kind: PersonKind,
        query: Option<&str>,
    ) -> Result<Vec<Person>, ConsoleError> {
        self.hit()?;
        self.queries.lock().unwrap().push(query.map(str::to_string));
        Ok(self
            .people
            .iter()
            .filter(|p| query.is_none_or(|q| p.last_name.contains(q)))
            .cloned()
            .collect())
    }

    async fn create_person(
        &self,
        _kind: PersonKind,
        _payload: &NewPersonPayload,
    ) -> Result<CreatedRecord, ConsoleError> {
        self.hit()?;
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        Ok(CreatedRecord {
            id: 100,
            created_at: at,
            updated_at: at,
        })
    }

    async fn update_person(
        &self,
        _kind: PersonKind,
        id: i64,
        patch: &PersonPatch,
    ) -> Result<Value, ConsoleError> {
        self.hit()?;
        self.patches.lock().unwrap().push((id, patch.clone()));
        Ok(json!({ "id": id }))
    }

    async fn assign_students(&self, request: &AssignmentRequest) -> Result<Value, ConsoleError> {
        self.hit()?;
        self.assignments.lock().unwrap().push(request.clone());
        Ok(json!({}))
    }
}

async fn loaded_section(api: &FakeApi) -> PersonSection {
    let mut section = PersonSection::new(PersonKind::Student);
    assert!(section.refresh(api).await);
    section
}

#[tokio::test]
async fn test_stale_fetch_is_discarded() {
    let mut store: ResourceStore<Person> = ResourceStore::new();

    let first = store.begin_fetch();
    let second = store.begin_fetch();

    assert!(store.complete_fetch(second, Ok(vec![person(2, YearLevel::First, 1)])));
    assert!(!store.complete_fetch(first, Ok(vec![person(1, YearLevel::First, 1)])));

    let ids: Vec<i64> = store.records().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2]);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_failed_fetch_keeps_records_and_reports_error() {
    let mut store: ResourceStore<Person> = ResourceStore::new();
    let ticket = store.begin_fetch();
    store.complete_fetch(ticket, Ok(vec![person(1, YearLevel::First, 1)]));

    let ticket = store.begin_fetch();
    store.complete_fetch(
        ticket,
        Err(ConsoleError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An error occurred".to_string(),
        }),
    );

    assert_eq!(store.records().len(), 1);
    assert_eq!(store.error(), Some("An error occurred"));
}

#[tokio::test]
async fn test_search_refetches_with_query() {
    let api = FakeApi::with_people(vec![person(1, YearLevel::First, 1)]);
    let mut section = loaded_section(&api).await;

    section.search(&api, "  ada ").await;
    section.clear_search(&api).await;

    let queries = api.queries.lock().unwrap().clone();
    assert_eq!(queries, vec![None, Some("ada".to_string()), None]);
}

#[tokio::test]
async fn test_filters_narrow_visible_rows() {
    let api = FakeApi::with_people(vec![
        person(1, YearLevel::First, 1),
        person(2, YearLevel::Second, 1),
        person(3, YearLevel::First, 2),
    ]);
    let mut section = loaded_section(&api).await;

    section.select_year("FIRST");
    assert_eq!(section.page().total, 2);

    section.select_course("2");
    let page = section.page();
    assert_eq!(page.rows.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);

    section.select_year("ALL");
    section.select_course("ALL");
    assert_eq!(section.page().total, 3);
}

#[tokio::test]
async fn test_delete_selected_is_local_only() {
    let api = FakeApi::with_people((1..=4).map(|id| person(id, YearLevel::First, 1)).collect());
    let mut section = loaded_section(&api).await;
    let before = api.request_count();

    section.toggle_row(2);
    section.toggle_row(3);
    assert_eq!(section.delete_selected(), 2);
    assert!(section.selection().is_empty());
    assert_eq!(section.page().total, 2);
    assert_eq!(api.request_count(), before);

    section.refresh(&api).await;
    assert_eq!(section.page().total, 4);
}

#[tokio::test]
async fn test_toggle_all_round_trip() {
    let api = FakeApi::with_people((1..=3).map(|id| person(id, YearLevel::First, 1)).collect());
    let mut section = loaded_section(&api).await;

    let event = section.toggle_all();
    assert!(matches!(event, TableEvent::SelectionChanged(ref ids) if ids.len() == 3));
    assert!(section.page().all_selected);

    section.toggle_all();
    assert!(section.selection().is_empty());
}

#[tokio::test]
async fn test_create_appends_and_alerts() {
    let api = FakeApi::default();
    let mut section = loaded_section(&api).await;
    let catalog = catalog();

    section.open_create(&catalog);
    let form = section.create_form_mut().unwrap();
    form.first_name = "Ada".to_string();
    form.last_name = "Lovelace".to_string();
    form.address = "London".to_string();
    form.email = "ada@example.edu".to_string();
    form.identifier = "S-100".to_string();
    form.course_id = Some(2);

    assert!(section.submit_create(&api, &catalog).await);
    assert!(!section.create_modal().is_open());
    assert_eq!(section.alert().unwrap().message, "Student added successfully");

    let created = section.store().get(100).unwrap();
    assert_eq!(created.department_id, Some(20));
    assert_eq!(created.year_level, Some(YearLevel::First));
}

#[tokio::test]
async fn test_invalid_create_form_sends_nothing() {
    let api = FakeApi::default();
    let mut section = loaded_section(&api).await;
    let before = api.request_count();

    section.open_create(&catalog());
    assert!(!section.submit_create(&api, &catalog()).await);

    assert_eq!(api.request_count(), before);
    assert!(section.create_modal().is_open());
    let errors = section.create_form().errors();
    assert_eq!(errors.get("studentId"), Some("Student ID is required"));
    assert_eq!(errors.get("firstName"), Some("First Name is required"));
}

#[tokio::test]
async fn test_conflict_keeps_modal_open() {
    let mut api = FakeApi::default();
    let mut section = loaded_section(&api).await;
    api.reject = Some((StatusCode::CONFLICT, "Username already exists".to_string()));

    section.open_create(&catalog());
    let form = section.create_form_mut().unwrap();
    form.first_name = "Ada".to_string();
    form.last_name = "Lovelace".to_string();
    form.address = "London".to_string();
    form.email = "ada@example.edu".to_string();
    form.identifier = "S-100".to_string();

    assert!(!section.submit_create(&api, &catalog()).await);
    assert_eq!(section.create_modal().phase(), ModalPhase::Open);
    assert_eq!(section.create_form().first_name, "Ada");
    assert_eq!(
        section.alert().unwrap().message,
        "Conflict Error: Username already exists"
    );
}

#[tokio::test]
async fn test_unchanged_edit_makes_no_request() {
    let api = FakeApi::with_people(vec![person(1, YearLevel::First, 1)]);
    let mut section = loaded_section(&api).await;
    let before = api.request_count();

    assert!(section.open_view(1));
    assert!(section.begin_edit());
    section.draft_mut().unwrap().set(PersonField::ContactNumber, "N/A");
    assert!(!section.can_save());

    assert!(section.save_edit(&api, &catalog()).await);
    assert_eq!(api.request_count(), before);
    assert!(!section.view_modal().is_open());
}

#[tokio::test]
async fn test_course_change_patches_department_and_merges() {
    let api = FakeApi::with_people(vec![person(1, YearLevel::First, 1)]);
    let mut section = loaded_section(&api).await;

    section.open_view(1);
    section.begin_edit();
    section.draft_mut().unwrap().set(PersonField::CourseId, "2");
    assert!(section.can_save());
    assert!(section.save_edit(&api, &catalog()).await);

    let patches = api.patches.lock().unwrap().clone();
    assert_eq!(
        patches,
        vec![(
            1,
            PersonPatch {
                course_id: Some(Some(2)),
                department_id: Some(Some(20)),
                ..PersonPatch::default()
            }
        )]
    );

    let merged = section.store().get(1).unwrap();
    assert_eq!(merged.course_id, Some(2));
    assert_eq!(merged.department_id, Some(20));
    assert_eq!(section.alert().unwrap().message, "Student updated successfully");
}

#[tokio::test]
async fn test_cancel_edit_restores_snapshot() {
    let api = FakeApi::with_people(vec![person(1, YearLevel::First, 1)]);
    let mut section = loaded_section(&api).await;

    section.open_view(1);
    section.begin_edit();
    section.draft_mut().unwrap().set(PersonField::FirstName, "Changed");
    section.cancel_edit();

    assert_eq!(section.view_modal().phase(), ModalPhase::Open);
    assert_eq!(section.draft().unwrap().display(PersonField::FirstName), "First1");
}

#[tokio::test]
async fn test_assignment_flow_clears_selection() {
    let api = FakeApi::with_people((1..=3).map(|id| person(id, YearLevel::First, 1)).collect());
    let mut section = loaded_section(&api).await;

    assert!(!section.open_assignment(AssignmentMode::Assign));

    section.toggle_row(1);
    section.toggle_row(3);
    assert!(section.open_assignment(AssignmentMode::Transfer));
    section.assignment_mut().unwrap().select_coach("9");

    assert!(section.confirm_assignment(&api).await);
    assert!(section.assignment().is_none());
    assert!(section.selection().is_empty());
    assert_eq!(
        section.alert().unwrap().message,
        "2 student(s) processed. (Mode: Transfer Students)"
    );

    let sent = api.assignments.lock().unwrap().clone();
    assert_eq!(sent[0].student_ids, vec![1, 3]);
    assert_eq!(sent[0].coach_id, 9);
}

#[tokio::test]
async fn test_profile_diff_skips_placeholder() {
    let api = FakeApi::default();
    let mut editor = ProfileEditor::new();
    assert!(editor.is_loading());
    assert!(editor.load(&api).await);

    assert_eq!(editor.display(ProfileField::Address), "N/A");
    assert!(editor.begin_edit());
    editor.set(ProfileField::Address, "N/A");
    editor.set(ProfileField::FirstName, "Ada");
    assert!(editor.diff().is_empty());

    editor.set(ProfileField::ContactNumber, "09171234567");
    assert!(editor.save(&api).await);

    let updates = api.profile_updates.lock().unwrap().clone();
    assert_eq!(
        updates,
        vec![ProfileUpdate {
            contact_number: Some("09171234567".to_string()),
            ..ProfileUpdate::default()
        }]
    );
    assert_eq!(
        editor.profile().unwrap().contact_number.as_deref(),
        Some("09171234567")
    );
    assert_eq!(
        editor.alert().current().unwrap().message,
        "Profile updated successfully!"
    );
}

#[tokio::test]
async fn test_profile_validation_blocks_request() {
    let api = FakeApi::default();
    let mut editor = ProfileEditor::new();
    editor.load(&api).await;
    let before = api.request_count();

    editor.begin_edit();
    editor.set(ProfileField::EmailAddress, "not-an-email");
    assert!(!editor.save(&api).await);

    assert_eq!(api.request_count(), before);
    assert_eq!(
        editor.alert().current().unwrap().message,
        "Email address must be a valid email"
    );
}

#[tokio::test]
async fn test_open_create_presets_year_and_first_course() {
    let api = FakeApi::default();
    let mut section = loaded_section(&api).await;

    section.open_create(&catalog());

    assert_eq!(section.create_modal().phase(), ModalPhase::Open);
    let form = section.create_form();
    assert_eq!(form.year_level, Some(YearLevel::First));
    assert_eq!(form.course_id, Some(1));
    assert!(form.first_name.is_empty());
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn test_open_create_without_courses_leaves_course_empty() {
    let api = FakeApi::default();
    let mut section = loaded_section(&api).await;

    section.open_create(&CourseCatalog::default());
    assert_eq!(section.create_form().course_id, None);
}

#[tokio::test]
async fn test_superseded_search_is_discarded() {
    let api = FakeApi::with_people((1..=3).map(|id| person(id, YearLevel::First, 1)).collect());
    let mut section = PersonSection::new(PersonKind::Student);

    let first = section.begin_search("Last1");
    let second = section.begin_search("Last2");
    assert_eq!(first.query(), Some("Last1"));
    assert!(section.store().is_loading());

    let second = second.run(&api).await;
    let first = first.run(&api).await;

    assert!(section.finish_fetch(second));
    assert!(!section.finish_fetch(first));

    let ids: Vec<i64> = section.page().rows.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(section.query(), "Last2");
    assert!(!section.store().is_loading());
}

#[tokio::test]
async fn test_filter_change_drops_hidden_selection() {
    let api = FakeApi::with_people(vec![
        person(1, YearLevel::First, 1),
        person(2, YearLevel::First, 1),
        person(3, YearLevel::Second, 1),
    ]);
    let mut section = loaded_section(&api).await;

    section.toggle_row(1);
    section.toggle_row(2);
    section.select_year("SECOND");

    assert!(section.selection().is_empty());
    assert!(!section.page().all_selected);
    assert_eq!(section.delete_selected(), 0);

    section.select_year("ALL");
    assert_eq!(section.page().total, 3);
}

#[tokio::test]
async fn test_select_all_only_covers_filtered_rows() {
    let api = FakeApi::with_people(vec![
        person(1, YearLevel::First, 1),
        person(2, YearLevel::Second, 1),
        person(3, YearLevel::Second, 1),
    ]);
    let mut section = loaded_section(&api).await;

    section.select_year("SECOND");
    section.toggle_all();
    assert!(section.page().all_selected);

    assert_eq!(section.delete_selected(), 2);
    section.select_year("ALL");
    let ids: Vec<i64> = section.page().rows.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1]);
}
