pub mod errors;
pub mod fine;
pub mod item;
pub mod loan;
pub mod notice;
pub mod timestamp;
pub mod user;
pub mod value_objects;

pub use errors::*;
pub use fine::Fine;
pub use item::Item;
pub use loan::Loan;
pub use notice::{Notice, ReminderSummary};
pub use user::{Session, User};
pub use value_objects::*;
