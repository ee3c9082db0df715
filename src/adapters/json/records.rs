//! ドメインエンティティとJSONストアの対応付け

use super::store::Record;
use crate::domain::{Fine, FineId, Item, ItemId, Loan, LoanId, User, UserId};

impl Record for User {
    fn record_id(&self) -> Option<&str> {
        self.id.as_ref().map(UserId::as_str)
    }

    fn assign_record_id(&mut self, id: String) {
        self.id = Some(UserId::new(id));
    }
}

impl Record for Item {
    fn record_id(&self) -> Option<&str> {
        self.id.as_ref().map(ItemId::as_str)
    }

    fn assign_record_id(&mut self, id: String) {
        self.id = Some(ItemId::new(id));
    }
}

impl Record for Loan {
    fn record_id(&self) -> Option<&str> {
        self.id.as_ref().map(LoanId::as_str)
    }

    fn assign_record_id(&mut self, id: String) {
        self.id = Some(LoanId::new(id));
    }
}

impl Record for Fine {
    fn record_id(&self) -> Option<&str> {
        self.id().map(FineId::as_str)
    }

    fn assign_record_id(&mut self, id: String) {
        self.assign_id(FineId::new(id));
    }
}
