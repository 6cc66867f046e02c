mod alerts;
mod compose;
mod detail;
mod help;
mod mailbox;
mod pane;

pub use alerts::*;
pub use compose::*;
pub use detail::*;
pub use help::*;
pub use mailbox::*;
pub use pane::*;
