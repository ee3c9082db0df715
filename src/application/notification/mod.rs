mod reminder_service;

pub use reminder_service::{
    send_combined_reminders, send_overdue_reminders, send_payment_notification,
    send_return_reminders, send_welcome_notification, test_email_configuration,
};
