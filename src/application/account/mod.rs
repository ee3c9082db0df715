mod account_service;
mod errors;

pub use account_service::{
    UserStatistics, delete_user, login, register_user, set_user_active, user_statistics,
};
pub use errors::{AccountError, Result};
