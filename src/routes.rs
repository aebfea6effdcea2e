use actix_web::{get, post, put, web, HttpResponse};
use serde::Serialize;

use crate::errors::ApiError;
use crate::schemas::{Expense, ExpenseFilter, ExpensePatch, NewExpense, TransactionId};
use crate::store::ExpenseStore;
use crate::validation::ValidatedJson;

pub const GREETING: &str = "Hello! Welcome to Settleup.";

type Store = web::Data<dyn ExpenseStore>;

#[derive(Debug, Serialize)]
struct ExpenseAdded {
    message: &'static str,
    expense_id: TransactionId,
}

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ExpenseList {
    expenses: Vec<Expense>,
}

#[get("/")]
async fn greet() -> HttpResponse {
    HttpResponse::Ok().json(GREETING)
}

#[post("/expenses/add")]
async fn add_expense(
    store: Store,
    expense: ValidatedJson<NewExpense>,
) -> Result<HttpResponse, ApiError> {
    let expense_id = store.create(expense.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ExpenseAdded {
        message: "Expense added successfully",
        expense_id,
    }))
}

#[put("/expenses/{id}")]
async fn modify_expense(
    store: Store,
    id: web::Path<String>,
    patch: ValidatedJson<ExpensePatch>,
) -> Result<HttpResponse, ApiError> {
    store.update(&id, patch.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Message {
        message: "Expense updated successfully",
    }))
}

#[get("/expenses/{id}")]
async fn get_expense(store: Store, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let expense = store.get(&id).await?;
    Ok(HttpResponse::Ok().json(expense))
}

async fn list_expenses(
    store: Store,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, ApiError> {
    let filter = ExpenseFilter::from_pairs(query.into_inner()).normalized();
    let expenses = store.list(filter).await?;
    Ok(HttpResponse::Ok().json(ExpenseList { expenses }))
}

/// Registers every endpoint. The store must be provided as `web::Data<dyn ExpenseStore>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(greet)
        .service(add_expense)
        .service(web::resource(["/expenses", "/expenses/"]).route(web::get().to(list_expenses)))
        .service(modify_expense)
        .service(get_expense);
}
