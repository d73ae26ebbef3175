mod editor;
mod form;
mod timezone;

pub use editor::*;
pub use form::*;
pub use timezone::*;
