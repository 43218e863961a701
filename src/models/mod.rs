mod notification;
mod repository;

pub use notification::{HookSettings, NotificationResult};
pub use repository::Repository;
