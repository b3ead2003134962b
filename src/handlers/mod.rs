// HTTP handlers for the listener API

pub mod excludes;
pub mod health;
pub mod notify;

pub use excludes::{add_excludes, list_excludes, remove_excludes};
pub use health::health_check;
pub use notify::notify;
