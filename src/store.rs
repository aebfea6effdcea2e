use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageBackend;
use crate::schemas::{Expense, ExpenseFilter, ExpensePatch, NewExpense, TransactionId};

mod memory;
mod mongo;

pub use memory::MemoryExpenseStore;
pub use mongo::MongoExpenseStore;

pub const COLLECTION_NAME: &str = "expenses";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("expense {0} not found")]
    NotFound(TransactionId),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Inserts a new record under a freshly generated identifier and returns it.
    async fn create(&self, expense: NewExpense) -> StoreResult<TransactionId>;
    /// Applies the present fields of `patch`. An empty patch only checks existence.
    async fn update(&self, id: &str, patch: ExpensePatch) -> StoreResult<()>;
    async fn get(&self, id: &str) -> StoreResult<Expense>;
    /// Records matching every supplied filter, in insertion order.
    async fn list(&self, filter: ExpenseFilter) -> StoreResult<Vec<Expense>>;
    async fn close(&self) {}
}

pub(crate) fn new_transaction_id() -> TransactionId {
    uuid::Uuid::new_v4().to_string()
}

/// Opens the configured backend. The returned handle is shared by every worker.
pub async fn open(backend: &StorageBackend) -> StoreResult<Arc<dyn ExpenseStore>> {
    let store: Arc<dyn ExpenseStore> = match backend {
        StorageBackend::MongoDb { uri, database } => {
            Arc::new(MongoExpenseStore::connect(uri, database).await?)
        }
        StorageBackend::Memory => Arc::new(MemoryExpenseStore::new()),
    };
    Ok(store)
}
