use serde::{Deserialize, Serialize};

pub type TransactionId = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub transaction_id: TransactionId,
    pub group_id: String,
    pub description: Option<String>,
    pub amount: f64,
    pub paid_by: String,
}

/// Fields accepted when adding an expense. The identifier is assigned by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub group_id: String,
    pub description: Option<String>,
    pub amount: f64,
    pub paid_by: String,
}

impl NewExpense {
    pub fn into_expense(self, transaction_id: TransactionId) -> Expense {
        Expense {
            transaction_id,
            group_id: self.group_id,
            description: self.description,
            amount: self.amount,
            paid_by: self.paid_by,
        }
    }
}

/// A sparse update. `None` leaves the stored value untouched; for
/// `description`, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpensePatch {
    pub description: Option<Option<String>>,
    pub amount: Option<f64>,
    pub paid_by: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.paid_by.is_none()
    }

    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(paid_by) = &self.paid_by {
            expense.paid_by = paid_by.clone();
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseFilter {
    pub group_id: Option<String>,
    pub paid_by: Option<String>,
}

impl ExpenseFilter {
    /// Builds a filter from raw query pairs. A repeated key keeps its last value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut filter = ExpenseFilter::default();
        for (key, value) in pairs {
            match key.as_str() {
                "group_id" => filter.group_id = Some(value),
                "paid_by" => filter.paid_by = Some(value),
                _ => {}
            }
        }
        filter
    }

    /// Empty query values count as absent.
    pub fn normalized(self) -> Self {
        ExpenseFilter {
            group_id: self.group_id.filter(|g| !g.is_empty()),
            paid_by: self.paid_by.filter(|p| !p.is_empty()),
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.group_id.as_ref().map_or(true, |g| *g == expense.group_id)
            && self.paid_by.as_ref().map_or(true, |p| *p == expense.paid_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> Expense {
        Expense {
            transaction_id: "t1".to_string(),
            group_id: "trip1".to_string(),
            description: Some("lunch".to_string()),
            amount: 10.0,
            paid_by: "alice".to_string(),
        }
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut expense = lunch();
        let patch = ExpensePatch {
            paid_by: Some("bob".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut expense);
        assert_eq!(expense.paid_by, "bob");
        assert_eq!(expense.amount, 10.0);
        assert_eq!(expense.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn patch_can_clear_description() {
        let mut expense = lunch();
        let patch = ExpensePatch {
            description: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut expense);
        assert_eq!(expense.description, None);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(ExpensePatch::default().is_empty());
    }

    #[test]
    fn filter_treats_blank_values_as_absent() {
        let filter = ExpenseFilter {
            group_id: Some(String::new()),
            paid_by: Some("alice".to_string()),
        }
        .normalized();
        assert_eq!(filter.group_id, None);
        assert!(filter.matches(&lunch()));
    }

    #[test]
    fn filter_from_pairs_keeps_last_repeated_value() {
        let filter = ExpenseFilter::from_pairs(vec![
            ("group_id".to_string(), "a".to_string()),
            ("limit".to_string(), "5".to_string()),
            ("group_id".to_string(), "b".to_string()),
        ]);
        assert_eq!(
            filter,
            ExpenseFilter {
                group_id: Some("b".to_string()),
                paid_by: None,
            }
        );
    }

    #[test]
    fn filter_requires_every_supplied_field() {
        let filter = ExpenseFilter {
            group_id: Some("trip1".to_string()),
            paid_by: Some("bob".to_string()),
        };
        assert!(!filter.matches(&lunch()));
    }
}
