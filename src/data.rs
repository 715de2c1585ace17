use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type OwnerId = i64;
pub type AccountId = i64;
pub type EntryId = i64;

pub const SIGNIFICANT_DIGITS: u32 = 4;

/// An account owner. Everything but `id`, `name`, `dob` and `ssn` is copied through
/// untouched by the anonymizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Owner {
    pub id: OwnerId,
    pub name: String,
    pub dob: NaiveDate,
    pub ssn: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Fields shared by every account variant. This is also the CSV row: the variant
/// itself is not a column, it's given by the file the row lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AccountDetails {
    pub id: AccountId,
    pub owner_id: OwnerId,
    pub name: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum AccountKind {
    Savings,
    Checking,
}

impl AccountKind {
    /// File stem used by the persister for this variant.
    pub fn stem(self) -> &'static str {
        match self {
            AccountKind::Savings => "savings",
            AccountKind::Checking => "checking",
        }
    }
}

/// Closed set of account variants. Anything that doesn't care about the variant goes
/// through the accessors below, so balance repair and output never need to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Account {
    Savings(AccountDetails),
    Checking(AccountDetails),
}

impl Account {
    pub fn new(kind: AccountKind, details: AccountDetails) -> Self {
        match kind {
            AccountKind::Savings => Account::Savings(details),
            AccountKind::Checking => Account::Checking(details),
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            Account::Savings(_) => AccountKind::Savings,
            Account::Checking(_) => AccountKind::Checking,
        }
    }

    pub fn details(&self) -> &AccountDetails {
        match self {
            Account::Savings(details) | Account::Checking(details) => details,
        }
    }

    fn details_mut(&mut self) -> &mut AccountDetails {
        match self {
            Account::Savings(details) | Account::Checking(details) => details,
        }
    }

    pub fn id(&self) -> AccountId {
        self.details().id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.details().owner_id
    }

    pub fn balance(&self) -> Decimal {
        self.details().balance
    }

    pub fn set_balance(&mut self, balance: Decimal) {
        self.details_mut().balance = balance;
    }
}

/// A ledger line. `amount` is signed: withdrawals are negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RegisterEntry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub entry_name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// One point-in-time view of the bank records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub owners: Vec<Owner>,
    pub accounts: Vec<Account>,
    pub register_entries: Vec<RegisterEntry>,
}

impl Snapshot {
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            owners: self.owners.len(),
            accounts: self.accounts.len(),
            register_entries: self.register_entries.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordCounts {
    pub owners: usize,
    pub accounts: usize,
    pub register_entries: usize,
}

impl fmt::Display for RecordCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owners, {} accounts, {} registers",
            self.owners, self.accounts, self.register_entries
        )
    }
}

/// Anonymization errors. All of them abort the whole run: a partially anonymized
/// snapshot would no longer match the input counts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Account #{account} references unknown owner #{owner}")]
    BrokenOwnerReference { account: AccountId, owner: OwnerId },
    #[error("Register entry #{entry} references unknown account #{account}")]
    BrokenAccountReference { entry: EntryId, account: AccountId },
    #[error("Owner #{owner} has a malformed SSN")]
    MalformedSsn { owner: OwnerId },
    #[error("Duplicate owner #{0}")]
    DuplicateOwner(OwnerId),
    #[error("Duplicate account #{0}")]
    DuplicateAccount(AccountId),
    #[error("Id {0} can't be remapped without overflowing")]
    IdOutOfRange(i64),
    #[error("Date {0} can't be perturbed without leaving the calendar range")]
    DateOutOfRange(NaiveDate),
    #[error("Amount {0} can't be perturbed without overflowing")]
    AmountOutOfRange(Decimal),
    #[error("Balance of account #{0} overflows")]
    BalanceOutOfRange(AccountId),
}
