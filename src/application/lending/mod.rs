mod errors;
mod fine_service;
mod loan_service;

pub use errors::{LendingError, Result};
pub use fine_service::{
    adjust_fine, fines_for_user, has_unpaid_fines, outstanding_balance, pay_fine, unpaid_fines,
};
pub use loan_service::{
    ReturnOutcome, borrow_item, extend_loan, find_overdue, loans_for_user, return_item,
};
