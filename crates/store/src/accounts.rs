//! Account directory seam.
//!
//! The ledger does not own the chart of accounts; it only needs to know
//! whether an account exists, its display name, and whether it currently
//! accepts direct postings. That contract is the `AccountDirectory`
//! trait, with an in-memory implementation for tests and embedded use.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use tally_shared::types::AccountCode;

/// What the ledger needs to know about an account.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    /// The account code.
    pub code: AccountCode,
    /// Display name, denormalized onto journal lines at write time.
    pub name: String,
    /// Whether the account currently accepts direct postings.
    pub allows_posting: bool,
}

/// Resolves account codes for line validation and posting gates.
pub trait AccountDirectory: Send + Sync {
    /// Looks up an account by code. `None` means the account is unknown.
    fn lookup(&self, code: &AccountCode) -> Option<AccountRecord>;
}

/// Thread-safe in-memory account directory.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: RwLock<BTreeMap<AccountCode, AccountRecord>>,
}

impl InMemoryAccountDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an account.
    pub fn insert(&self, record: AccountRecord) {
        self.accounts.write().insert(record.code.clone(), record);
    }

    /// Convenience constructor for a postable account.
    pub fn insert_postable(&self, code: &str, name: &str) {
        self.insert(AccountRecord {
            code: AccountCode::new(code),
            name: name.to_string(),
            allows_posting: true,
        });
    }

    /// Flips whether an account accepts postings. Returns false if the
    /// account is unknown.
    pub fn set_allows_posting(&self, code: &AccountCode, allows_posting: bool) -> bool {
        match self.accounts.write().get_mut(code) {
            Some(record) => {
                record.allows_posting = allows_posting;
                true
            }
            None => false,
        }
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn lookup(&self, code: &AccountCode) -> Option<AccountRecord> {
        self.accounts.read().get(code).cloned()
    }
}
