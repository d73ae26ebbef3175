mod compose;
mod dialogs;
mod entries;
mod help;
mod pane;
mod response;

pub use compose::*;
pub use dialogs::*;
pub use entries::*;
pub use help::*;
pub use pane::*;
pub use response::*;
