use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{new_transaction_id, ExpenseStore, StoreError, StoreResult};
use crate::schemas::{Expense, ExpenseFilter, ExpensePatch, NewExpense, TransactionId};

/// Process-local store. Readers run concurrently, writers are serialized.
#[derive(Debug, Default)]
pub struct MemoryExpenseStore {
    expenses: RwLock<Vec<Expense>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn create(&self, expense: NewExpense) -> StoreResult<TransactionId> {
        let id = new_transaction_id();
        self.expenses
            .write()
            .await
            .push(expense.into_expense(id.clone()));
        debug!(transaction_id = %id, "expense inserted");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: ExpensePatch) -> StoreResult<()> {
        let mut expenses = self.expenses.write().await;
        let expense = expenses
            .iter_mut()
            .find(|e| e.transaction_id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(expense);
        debug!(transaction_id = %id, "expense updated");
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Expense> {
        self.expenses
            .read()
            .await
            .iter()
            .find(|e| e.transaction_id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self, filter: ExpenseFilter) -> StoreResult<Vec<Expense>> {
        Ok(self
            .expenses
            .read()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}
