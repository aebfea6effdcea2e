//! Runs against a live MongoDB when `MONGODB_URI` is set; otherwise each test returns early.

use mongodb::{Client, Database};
use settleup::{
    schemas::{ExpenseFilter, ExpensePatch, NewExpense},
    store::{ExpenseStore, MongoExpenseStore, StoreError},
};

async fn scratch_store() -> anyhow::Result<Option<(MongoExpenseStore, Database)>> {
    let Ok(uri) = std::env::var("MONGODB_URI") else {
        eprintln!("MONGODB_URI missing; skipping MongoDB store tests");
        return Ok(None);
    };
    let client = Client::with_uri_str(&uri).await?;
    let database = client.database(&format!("settleup_test_{}", uuid::Uuid::new_v4().simple()));
    let store = MongoExpenseStore::from_database(client, database.clone()).await?;
    Ok(Some((store, database)))
}

fn new_expense(group_id: &str, amount: f64, paid_by: &str) -> NewExpense {
    NewExpense {
        group_id: group_id.to_string(),
        description: None,
        amount,
        paid_by: paid_by.to_string(),
    }
}

#[tokio::test]
async fn create_get_update_round() -> anyhow::Result<()> {
    let Some((store, database)) = scratch_store().await? else {
        return Ok(());
    };

    let id = store.create(new_expense("trip1", 10.0, "alice")).await?;
    let expense = store.get(&id).await?;
    assert_eq!(expense.group_id, "trip1");
    assert_eq!(expense.description, None);
    assert_eq!(expense.amount, 10.0);

    store
        .update(
            &id,
            ExpensePatch {
                paid_by: Some("bob".to_string()),
                description: Some(Some("dinner".to_string())),
                ..Default::default()
            },
        )
        .await?;
    let expense = store.get(&id).await?;
    assert_eq!(expense.paid_by, "bob");
    assert_eq!(expense.description.as_deref(), Some("dinner"));
    assert_eq!(expense.amount, 10.0);

    store.update(&id, ExpensePatch::default()).await?;
    assert!(matches!(
        store.update("missing", ExpensePatch::default()).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.get("missing").await, Err(StoreError::NotFound(_))));

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
async fn list_respects_filters_and_order() -> anyhow::Result<()> {
    let Some((store, database)) = scratch_store().await? else {
        return Ok(());
    };

    let a = store.create(new_expense("trip1", 1.0, "alice")).await?;
    let b = store.create(new_expense("trip2", 2.0, "alice")).await?;
    let c = store.create(new_expense("trip1", 3.0, "bob")).await?;

    let ids = |expenses: Vec<settleup::schemas::Expense>| -> Vec<String> {
        expenses.into_iter().map(|e| e.transaction_id).collect()
    };
    assert_eq!(
        ids(store.list(ExpenseFilter::default()).await?),
        vec![a.clone(), b, c.clone()]
    );
    assert_eq!(
        ids(store
            .list(ExpenseFilter {
                group_id: Some("trip1".to_string()),
                paid_by: None,
            })
            .await?),
        vec![a, c]
    );

    database.drop(None).await?;
    Ok(())
}

#[tokio::test]
async fn concurrent_startup_on_fresh_database() -> anyhow::Result<()> {
    let Ok(uri) = std::env::var("MONGODB_URI") else {
        return Ok(());
    };
    let client = Client::with_uri_str(&uri).await?;
    let database = client.database(&format!("settleup_test_{}", uuid::Uuid::new_v4().simple()));

    let (first, second) = tokio::join!(
        MongoExpenseStore::from_database(client.clone(), database.clone()),
        MongoExpenseStore::from_database(client.clone(), database.clone()),
    );
    let (first, second) = (first?, second?);

    let id = first.create(new_expense("trip1", 4.0, "alice")).await?;
    assert_eq!(second.get(&id).await?.amount, 4.0);

    database.drop(None).await?;
    Ok(())
}
