//! Client-side state of the admin console.
//!
//! Everything here is plain data plus transitions: the data stores, the
//! table/selection model, filters, the create and view/edit modal flows, the
//! profile editor and the coach assignment flow. Network access goes through
//! [`ConsoleApi`], which talks to the proxy routes in [`crate::api`].

pub mod alert;
pub mod api;
pub mod assignment;
pub mod catalog;
pub mod filter;
pub mod form;
pub mod modal;
pub mod profile;
pub mod section;
pub mod store;
pub mod table;

pub use alert::{Alert, AlertKind, AlertSlot};
pub use api::{ConsoleApi, ConsoleError, CreatedRecord, HttpConsoleApi};
pub use assignment::AssignmentFlow;
pub use catalog::{CourseCatalog, DropdownOption, ProgramSummary, program_summaries};
pub use filter::RecordFilter;
pub use form::{CreateForm, EditDraft, NOT_AVAILABLE, PersonField};
pub use modal::{ModalPhase, ModalState};
pub use profile::{ProfileEditor, ProfileField};
pub use section::{FetchOutcome, PendingFetch, PersonSection};
pub use store::{FetchTicket, Record, ResourceStore};
pub use table::{Selection, SortOrder, TableEvent, TablePage, TableView};
