//! Entry list management, page selection and the merge orchestrator.
//!
//! - [`entries`]: source files and the ordered, reorderable entry list.
//! - [`page_spec`]: parsing page specifications such as `"1-3,5"`.
//! - [`plan`]: resolving every entry into the pages it contributes.
//! - [`merger`]: the session that runs merges over the entry list.

pub mod entries;
pub mod merger;
pub mod page_spec;
pub mod plan;

pub use entries::{EntryList, Reorderable, SourceEntry, SourceFile};
pub use merger::{
    AddReport, CancelHandle, MergeJob, MergeOutput, MergeState, MergeStatistics, Merger,
};
pub use page_spec::{PageSpecError, PageSpecErrorKind, parse_page_spec, resolve_pages};
pub use plan::{MergePlan, PageRef, PlannedEntry};
