pub mod format;
pub mod import_result;
pub mod job;
pub mod loaders;
pub mod question;

pub use format::{FormatDescriptor, ImportFormat, BLANK_PLACEHOLDER};
pub use import_result::{Diagnostic, ImportResult, SkipReason, NO_VALID_QUESTIONS};
pub use job::ImportJob;
pub use loaders::{load_all_jobs, load_job};
pub use question::{
    Blank, BlankQuestion, ChoiceLayout, ChoiceQuestion, DragDropQuestion, Dropdown,
    DropdownQuestion, Question,
};
