use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{FindOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use tracing::{debug, info};

use super::{new_transaction_id, ExpenseStore, StoreError, StoreResult, COLLECTION_NAME};
use crate::schemas::{Expense, ExpenseFilter, ExpensePatch, NewExpense, TransactionId};

pub struct MongoExpenseStore {
    client: Client,
    expenses: Collection<Expense>,
}

impl MongoExpenseStore {
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self::from_database(client.clone(), client.database(database)).await?;
        info!(database, "connected to MongoDB");
        Ok(store)
    }

    /// Ensures the unique identifier index. Building the index creates the
    /// `expenses` collection when it is absent, and repeating it is a no-op.
    pub async fn from_database(client: Client, database: Database) -> StoreResult<Self> {
        let expenses = database.collection::<Expense>(COLLECTION_NAME);
        let index = IndexModel::builder()
            .keys(doc! { "transaction_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        expenses.create_index(index, None).await?;
        info!(collection = COLLECTION_NAME, "transaction_id index ready");
        Ok(Self { client, expenses })
    }
}

fn id_filter(id: &str) -> Document {
    doc! { "transaction_id": id }
}

fn filter_document(filter: &ExpenseFilter) -> Document {
    let mut query = Document::new();
    if let Some(group_id) = &filter.group_id {
        query.insert("group_id", group_id.as_str());
    }
    if let Some(paid_by) = &filter.paid_by {
        query.insert("paid_by", paid_by.as_str());
    }
    query
}

fn set_document(patch: &ExpensePatch) -> Document {
    let mut set = Document::new();
    if let Some(description) = &patch.description {
        set.insert("description", Bson::from(description.clone()));
    }
    if let Some(amount) = patch.amount {
        set.insert("amount", amount);
    }
    if let Some(paid_by) = &patch.paid_by {
        set.insert("paid_by", paid_by.as_str());
    }
    set
}

#[async_trait]
impl ExpenseStore for MongoExpenseStore {
    async fn create(&self, expense: NewExpense) -> StoreResult<TransactionId> {
        let id = new_transaction_id();
        self.expenses
            .insert_one(expense.into_expense(id.clone()), None)
            .await?;
        debug!(transaction_id = %id, "expense inserted");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: ExpensePatch) -> StoreResult<()> {
        if patch.is_empty() {
            return match self.expenses.count_documents(id_filter(id), None).await? {
                0 => Err(StoreError::NotFound(id.to_string())),
                _ => Ok(()),
            };
        }
        let result = self
            .expenses
            .update_one(id_filter(id), doc! { "$set": set_document(&patch) }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(transaction_id = %id, "expense updated");
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Expense> {
        self.expenses
            .find_one(id_filter(id), None)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self, filter: ExpenseFilter) -> StoreResult<Vec<Expense>> {
        // ObjectIds grow monotonically, so sorting on _id yields insertion order.
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.expenses.find(filter_document(&filter), options).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}
