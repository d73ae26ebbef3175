pub mod filter;
pub mod query;
pub mod snapshot;
pub mod sort;
pub mod source;
pub mod types;

pub use filter::{comparison_text, filter, matches};
pub use query::{MatchMode, Query};
pub use snapshot::{load_snapshot, save_snapshot, snapshot_path};
pub use sort::{SortKey, UnknownSortKey, sort_by, sort_by_label, sorted_indices};
pub use source::{entries_from_value, load_entries, parse_entries};
pub use types::Entry;
