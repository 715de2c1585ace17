use crate::data::{Account, AccountId, Error, RegisterEntry};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Set every account's balance to the sum of its ledger entries. Accounts without
/// entries end up at zero: balances are derived here, never carried over.
pub(crate) fn repair_balances(
    accounts: &mut [Account],
    entries: &[RegisterEntry],
) -> Result<(), Error> {
    let mut totals = HashMap::<AccountId, Decimal>::new();
    for entry in entries {
        let total = totals.entry(entry.account_id).or_default();
        *total = total
            .checked_add(entry.amount)
            .ok_or(Error::BalanceOutOfRange(entry.account_id))?;
    }
    for account in accounts {
        let total = totals.get(&account.id()).copied().unwrap_or_default();
        account.set_balance(total);
    }
    Ok(())
}
