use std::path::Path;

use crate::db::repository::TransactionStore;
use crate::errors::Error;

/// Writes every transaction as a headerless CSV row in the same
/// `date,description,amount,type,category` format the importer reads.
pub fn export_transactions_to_csv(store: &TransactionStore, path: &Path) -> Result<usize, Error> {
    let mut writer = csv::Writer::from_path(path)?;

    for transaction in store.all() {
        writer.write_record([
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.description.clone(),
            transaction.amount.to_string(),
            transaction.kind.label().to_string(),
            transaction.category.clone(),
        ])?;
    }
    writer.flush()?;

    let count = store.all().len();
    tracing::info!("Exported {} transactions to {}", count, path.display());
    Ok(count)
}
