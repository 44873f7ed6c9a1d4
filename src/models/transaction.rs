use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Housing",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Other",
];

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salary",
    "Freelance",
    "Investments",
    "Gifts",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn toggle(self) -> Self {
        match self {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The fixed category list for this transaction type.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => INCOME_CATEGORIES,
            TransactionType::Expense => EXPENSE_CATEGORIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub date: NaiveDate,
}

impl Transaction {
    /// Validates the record invariants: non-empty description, amount
    /// strictly greater than zero, category drawn from the list for `kind`.
    pub fn new(
        id: String,
        description: String,
        amount: Decimal,
        kind: TransactionType,
        category: String,
        date: NaiveDate,
    ) -> Result<Self, Error> {
        if description.trim().is_empty() {
            return Err(Error::InvalidTransaction(
                "description cannot be empty".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidTransaction(format!(
                "amount must be greater than zero, got {}",
                amount
            )));
        }
        if !kind.categories().contains(&category.as_str()) {
            return Err(Error::InvalidTransaction(format!(
                "'{}' is not a valid {} category",
                category,
                kind.label()
            )));
        }

        Ok(Self {
            id,
            description,
            amount,
            kind,
            category,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_transaction(
        description: &str,
        amount: Decimal,
        kind: TransactionType,
        category: &str,
    ) -> Result<Transaction, Error> {
        Transaction::new(
            "tx-1".to_string(),
            description.to_string(),
            amount,
            kind,
            category.to_string(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        )
    }

    #[test]
    fn test_new_transaction_valid() {
        let result = new_transaction("Coffee", Decimal::new(450, 2), TransactionType::Expense, "Food");
        assert!(result.is_ok());

        let transaction = result.unwrap();
        assert_eq!(transaction.id, "tx-1");
        assert_eq!(transaction.amount, Decimal::new(450, 2));
        assert_eq!(transaction.category, "Food");
    }

    #[test]
    fn test_new_transaction_empty_description() {
        let result = new_transaction("  ", Decimal::ONE, TransactionType::Expense, "Food");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("description"));
    }

    #[test]
    fn test_new_transaction_zero_amount() {
        let result = new_transaction("Coffee", Decimal::ZERO, TransactionType::Expense, "Food");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("greater than zero"));
    }

    #[test]
    fn test_new_transaction_negative_amount() {
        let result = new_transaction("Coffee", Decimal::new(-5, 0), TransactionType::Expense, "Food");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_transaction_category_must_match_type() {
        // Salary is an income category, not an expense category.
        let result = new_transaction("Paycheck", Decimal::ONE, TransactionType::Expense, "Salary");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("expense category"));

        let result = new_transaction("Paycheck", Decimal::ONE, TransactionType::Income, "Salary");
        assert!(result.is_ok());
    }

    #[test]
    fn test_categories_for_type() {
        assert_eq!(TransactionType::Expense.categories()[0], "Food");
        assert_eq!(TransactionType::Income.categories()[0], "Salary");
        assert_eq!(TransactionType::Expense.categories().len(), 8);
        assert_eq!(TransactionType::Income.categories().len(), 5);
    }

    #[test]
    fn test_serialized_field_names() {
        let transaction = new_transaction("Coffee", Decimal::new(450, 2), TransactionType::Expense, "Food")
            .unwrap();
        let json = serde_json::to_string(&transaction).unwrap();

        assert!(json.contains("\"id\":\"tx-1\""));
        assert!(json.contains("\"type\":\"expense\""));
        assert!(json.contains("\"category\":\"Food\""));
        assert!(json.contains("\"date\":\"2025-01-15\""));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transaction);
    }
}
