pub mod notifier;
pub mod waiting;

pub use notifier::{Notification, NotificationLevel, Notifier, ToastSlot, TracingNotifier};
pub use waiting::WaitingFlag;
