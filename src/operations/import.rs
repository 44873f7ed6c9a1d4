use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::repository::TransactionStore;
use crate::errors::Error;
use crate::models::transaction::{Transaction, TransactionType};

/// Reads headerless CSV rows of `date,description,amount,type,category` and
/// appends them to the store with freshly generated ids. The whole file is
/// parsed and validated before anything is added, so a bad line imports
/// nothing.
pub fn import_transactions_from_csv(
    store: &mut TransactionStore,
    path: &Path,
) -> Result<usize, Error> {
    let file = File::open(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .from_reader(file);

    let mut transactions = Vec::new();
    for (line_index, result) in reader.records().enumerate() {
        let line = line_index + 1;
        let record = result?;

        if record.len() != 5 {
            return Err(Error::Import {
                line,
                message: format!("expected 5 columns, got {}", record.len()),
            });
        }

        let transaction = parse_record(&record)
            .map_err(|message| Error::Import { line, message })?;
        transactions.push(transaction);
    }

    let count = transactions.len();
    for transaction in transactions {
        store.add(transaction)?;
    }
    tracing::info!("Imported {} transactions from {}", count, path.display());

    Ok(count)
}

fn parse_record(record: &csv::StringRecord) -> Result<Transaction, String> {
    let date = NaiveDate::parse_from_str(record.get(0).unwrap_or(""), "%Y-%m-%d")
        .map_err(|_| "invalid date, expected YYYY-MM-DD".to_string())?;

    let description = record.get(1).unwrap_or("").to_string();

    let amount = Decimal::from_str(record.get(2).unwrap_or(""))
        .map_err(|_| format!("invalid amount '{}'", record.get(2).unwrap_or("")))?;

    let kind = match record.get(3).unwrap_or("").to_lowercase().as_str() {
        "income" => TransactionType::Income,
        "expense" => TransactionType::Expense,
        other => return Err(format!("invalid type '{}', expected income or expense", other)),
    };

    let category = record.get(4).unwrap_or("").to_string();

    Transaction::new(
        Uuid::new_v4().to_string(),
        description,
        amount,
        kind,
        category,
        date,
    )
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn empty_store() -> TransactionStore {
        let kv = establish_test_connection().unwrap();
        TransactionStore::load(kv).unwrap()
    }

    fn write_temp_csv(contents: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().expect("Failed to create temp file");
        write!(tmp, "{}", contents).expect("Failed to write test CSV");
        tmp
    }

    #[test]
    fn test_import_csv_success() {
        let mut store = empty_store();
        let csv_data = "\
2025-11-10,Paycheck,1500.00,income,Salary
2025-11-11,Coffee,3.50,expense,Food
";

        let tmp = write_temp_csv(csv_data);
        let count = import_transactions_from_csv(&mut store, tmp.path()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.all().len(), 2);
        assert_eq!(store.all()[0].description, "Paycheck");
        assert_eq!(store.all()[0].kind, TransactionType::Income);
        assert_eq!(store.all()[1].category, "Food");
        assert_eq!(store.all()[1].date, NaiveDate::from_ymd_opt(2025, 11, 11).unwrap());
    }

    #[test]
    fn test_import_csv_invalid_date() {
        let mut store = empty_store();
        let tmp = write_temp_csv("bad-date,Paycheck,1500.00,income,Salary\n");

        let result = import_transactions_from_csv(&mut store, tmp.path());
        assert!(result.is_err());

        let error = result.unwrap_err().to_string();
        assert!(error.contains("line 1"));
        assert!(error.contains("invalid date"));
    }

    #[test]
    fn test_import_csv_unknown_category() {
        let mut store = empty_store();
        let tmp = write_temp_csv("2025-11-10,Mystery,12.00,expense,Yachts\n");

        let result = import_transactions_from_csv(&mut store, tmp.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Yachts"));
    }

    #[test]
    fn test_import_csv_bad_line_imports_nothing() {
        let mut store = empty_store();
        let csv_data = "\
2025-11-10,Paycheck,1500.00,income,Salary
2025-11-11,Coffee,-3.50,expense,Food
";

        let tmp = write_temp_csv(csv_data);
        let result = import_transactions_from_csv(&mut store, tmp.path());

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("line 2"));
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_import_nonexistent_file() {
        let mut store = empty_store();
        let result = import_transactions_from_csv(&mut store, Path::new("nonexistent.csv"));
        assert!(result.is_err());
    }
}
