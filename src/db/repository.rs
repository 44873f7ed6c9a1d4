use crate::db::connection::KvStore;
use crate::errors::Error;
use crate::models::transaction::Transaction;

const TRANSACTIONS_KEY: &str = "transactions";

/// Owns the ordered transaction collection and keeps it synchronized with
/// the key-value backend. Every mutation re-serializes the full collection
/// and writes it through before returning.
pub struct TransactionStore {
    kv: KvStore,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn load(kv: KvStore) -> Result<Self, Error> {
        let transactions = match kv.get(TRANSACTIONS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(transactions) => transactions,
                Err(e) => {
                    // Bad content degrades to an empty collection; only
                    // backend failures abort startup.
                    tracing::warn!("Discarding malformed transaction data: {}", e);
                    Vec::new()
                }
            },
        };
        tracing::info!("Loaded {} transactions", transactions.len());

        Ok(Self { kv, transactions })
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add(&mut self, transaction: Transaction) -> Result<(), Error> {
        self.transactions.push(transaction);
        self.persist()
    }

    /// Replaces the record with a matching `id` wholesale, keeping that id.
    /// Returns whether a record matched; a miss leaves the collection
    /// unchanged.
    pub fn update(&mut self, id: &str, mut transaction: Transaction) -> Result<bool, Error> {
        let found = match self.transactions.iter().position(|t| t.id == id) {
            Some(pos) => {
                transaction.id = id.to_string();
                self.transactions[pos] = transaction;
                true
            }
            None => false,
        };
        self.persist()?;
        Ok(found)
    }

    /// Removes the record with a matching `id`, if present. Returns whether
    /// a record matched.
    pub fn remove(&mut self, id: &str) -> Result<bool, Error> {
        let found = match self.transactions.iter().position(|t| t.id == id) {
            Some(pos) => {
                self.transactions.remove(pos);
                true
            }
            None => false,
        };
        self.persist()?;
        Ok(found)
    }

    fn persist(&self) -> Result<(), Error> {
        let raw = serde_json::to_string(&self.transactions)?;
        self.kv.set(TRANSACTIONS_KEY, &raw)?;
        tracing::debug!("Persisted {} transactions", self.transactions.len());
        Ok(())
    }
}
