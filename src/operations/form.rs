use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::repository::TransactionStore;
use crate::errors::Error;
use crate::models::transaction::{Transaction, TransactionType};

/// Transient input state for the add/edit form. Nothing here is persisted;
/// the store is only touched by a successful `submit`.
pub struct FormState {
    pub description: String,
    pub amount: String,
    pub kind: TransactionType,
    pub category: String,
    mode: FormMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Idle,
    /// The edit target. The creation date is snapshotted here so the
    /// replacement record keeps it.
    Editing { id: String, date: NaiveDate },
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added,
    Updated,
    Rejected(&'static str),
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            kind: TransactionType::Expense,
            category: TransactionType::Expense.categories()[0].to_string(),
            mode: FormMode::Idle,
        }
    }
}

impl FormState {
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing { .. })
    }

    /// Snapshots the record's fields into the form and enters editing mode.
    pub fn start_edit(&mut self, transaction: &Transaction) {
        self.description = transaction.description.clone();
        self.amount = transaction.amount.to_string();
        self.kind = transaction.kind;
        self.category = transaction.category.clone();
        self.mode = FormMode::Editing {
            id: transaction.id.clone(),
            date: transaction.date,
        };
    }

    /// Discards any in-progress input and returns to the blank add form.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Changing the type resets the category to the first entry of the new
    /// type's list, so the category is always valid for the selected type.
    pub fn set_kind(&mut self, kind: TransactionType) {
        if self.kind != kind {
            self.kind = kind;
            self.category = kind.categories()[0].to_string();
        }
    }

    pub fn next_category(&mut self) {
        self.step_category(1);
    }

    pub fn prev_category(&mut self) {
        self.step_category(-1);
    }

    fn step_category(&mut self, delta: isize) {
        let categories = self.kind.categories();
        let current = categories
            .iter()
            .position(|c| *c == self.category)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(categories.len() as isize) as usize;
        self.category = categories[next].to_string();
    }

    /// Validates the fields and applies the submission to the store. A
    /// rejection leaves both the store and the fields untouched; a success
    /// resets the form to its blank add state.
    pub fn submit(&mut self, store: &mut TransactionStore) -> Result<SubmitOutcome, Error> {
        let description = self.description.trim();
        if description.is_empty() {
            return Ok(SubmitOutcome::Rejected("Description cannot be empty"));
        }

        let amount = match Decimal::from_str(self.amount.trim()) {
            Ok(amount) => amount,
            Err(_) => return Ok(SubmitOutcome::Rejected("Amount must be a number")),
        };
        if amount <= Decimal::ZERO {
            return Ok(SubmitOutcome::Rejected("Amount must be greater than zero"));
        }

        let outcome = match self.mode.clone() {
            FormMode::Editing { id, date } => {
                let replacement = Transaction::new(
                    id.clone(),
                    description.to_string(),
                    amount,
                    self.kind,
                    self.category.clone(),
                    date,
                )?;
                store.update(&id, replacement)?;
                SubmitOutcome::Updated
            }
            FormMode::Idle => {
                let transaction = Transaction::new(
                    Uuid::new_v4().to_string(),
                    description.to_string(),
                    amount,
                    self.kind,
                    self.category.clone(),
                    Local::now().date_naive(),
                )?;
                store.add(transaction)?;
                SubmitOutcome::Added
            }
        };

        *self = Self::default();
        Ok(outcome)
    }
}
