pub mod clock;
pub mod notification_service;
pub mod security_service;

pub use clock::FixedClock;
pub use notification_service::{NotificationService, SentEmail};
pub use security_service::SecurityService;
