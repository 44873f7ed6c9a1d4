use rust_decimal::Decimal;

use crate::models::transaction::{Transaction, TransactionType};

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Income)
        .map(|t| t.amount)
        .sum()
}

pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
        .map(|t| t.amount)
        .sum()
}

pub fn balance(transactions: &[Transaction]) -> Decimal {
    total_income(transactions) - total_expenses(transactions)
}

/// Sums expense amounts per category. Entries appear in order of first
/// occurrence in the input; categories nothing contributed to are absent.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut totals: Vec<(String, Decimal)> = Vec::new();

    for transaction in transactions.iter().filter(|t| t.kind == TransactionType::Expense) {
        match totals.iter_mut().find(|(category, _)| *category == transaction.category) {
            Some((_, sum)) => *sum += transaction.amount,
            None => totals.push((transaction.category.clone(), transaction.amount)),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn transaction(description: &str, amount: Decimal, kind: TransactionType, category: &str) -> Transaction {
        Transaction::new(
            format!("id-{}", description),
            description.to_string(),
            amount,
            kind,
            category.to_string(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_totals_empty_collection() {
        assert_eq!(total_income(&[]), Decimal::ZERO);
        assert_eq!(total_expenses(&[]), Decimal::ZERO);
        assert_eq!(balance(&[]), Decimal::ZERO);
        assert!(expenses_by_category(&[]).is_empty());
    }

    #[test]
    fn test_single_expense() {
        let transactions = vec![transaction(
            "Coffee",
            Decimal::new(450, 2),
            TransactionType::Expense,
            "Food",
        )];

        assert_eq!(total_expenses(&transactions), Decimal::new(450, 2));
        assert_eq!(balance(&transactions), Decimal::new(-450, 2));
        assert_eq!(
            expenses_by_category(&transactions),
            vec![("Food".to_string(), Decimal::new(450, 2))]
        );
    }

    #[test]
    fn test_income_and_expense_balance() {
        let transactions = vec![
            transaction("Paycheck", Decimal::new(1000, 0), TransactionType::Income, "Salary"),
            transaction("Rent", Decimal::new(200, 0), TransactionType::Expense, "Housing"),
        ];

        assert_eq!(total_income(&transactions), Decimal::new(1000, 0));
        assert_eq!(total_expenses(&transactions), Decimal::new(200, 0));
        assert_eq!(balance(&transactions), Decimal::new(800, 0));
    }

    #[test]
    fn test_balance_equals_income_minus_expenses() {
        let transactions = vec![
            transaction("Paycheck", Decimal::new(250075, 2), TransactionType::Income, "Salary"),
            transaction("Sold prints", Decimal::new(8050, 2), TransactionType::Income, "Freelance"),
            transaction("Rent", Decimal::new(120000, 2), TransactionType::Expense, "Housing"),
            transaction("Groceries", Decimal::new(15325, 2), TransactionType::Expense, "Food"),
            transaction("Bus pass", Decimal::new(4900, 2), TransactionType::Expense, "Transportation"),
        ];

        assert_eq!(
            balance(&transactions),
            total_income(&transactions) - total_expenses(&transactions)
        );
    }

    #[test]
    fn test_category_totals_sum_to_total_expenses() {
        let transactions = vec![
            transaction("Groceries", Decimal::new(8000, 2), TransactionType::Expense, "Food"),
            transaction("Paycheck", Decimal::new(300000, 2), TransactionType::Income, "Salary"),
            transaction("Takeaway", Decimal::new(2350, 2), TransactionType::Expense, "Food"),
            transaction("Cinema", Decimal::new(1500, 2), TransactionType::Expense, "Entertainment"),
        ];

        let by_category = expenses_by_category(&transactions);
        let sum: Decimal = by_category.iter().map(|(_, amount)| *amount).sum();
        assert_eq!(sum, total_expenses(&transactions));
    }

    #[test]
    fn test_categories_in_first_occurrence_order() {
        let transactions = vec![
            transaction("Cinema", Decimal::new(15, 0), TransactionType::Expense, "Entertainment"),
            transaction("Groceries", Decimal::new(80, 0), TransactionType::Expense, "Food"),
            transaction("Paycheck", Decimal::new(500, 0), TransactionType::Income, "Salary"),
            transaction("Takeaway", Decimal::new(20, 0), TransactionType::Expense, "Food"),
        ];

        let by_category = expenses_by_category(&transactions);
        assert_eq!(
            by_category,
            vec![
                ("Entertainment".to_string(), Decimal::new(15, 0)),
                ("Food".to_string(), Decimal::new(100, 0)),
            ]
        );
    }

    #[test]
    fn test_income_categories_never_appear_in_breakdown() {
        let transactions = vec![transaction(
            "Paycheck",
            Decimal::new(1000, 0),
            TransactionType::Income,
            "Salary",
        )];

        assert!(expenses_by_category(&transactions).is_empty());
    }
}
