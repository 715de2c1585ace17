use crate::{
    config::PersisterConfig,
    data::{
        Account, AccountDetails, AccountKind, Owner, RegisterEntry, Snapshot, SIGNIFICANT_DIGITS,
    },
};
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs::File;
use tracing::info;

/// Simple CSV importer for any record type.
pub(crate) fn read_records<R: std::io::Read, T: DeserializeOwned>(
    reader: R,
) -> Result<Vec<T>, anyhow::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

fn read_file<T: DeserializeOwned>(
    config: &PersisterConfig,
    stem: &str,
) -> Result<Vec<T>, anyhow::Error> {
    let path = config.path(stem);
    let file = File::open(&path).with_context(|| format!("can't open {}", path.display()))?;
    read_records(file).with_context(|| format!("can't read records from {}", path.display()))
}

/// Load the owners, both account files and the register. Savings and checking rows
/// share a layout: the file a row comes from decides its variant.
pub(crate) fn load_snapshot(config: &PersisterConfig) -> Result<Snapshot, anyhow::Error> {
    let owners: Vec<Owner> = read_file(config, "owners")?;
    let mut accounts = Vec::new();
    for kind in [AccountKind::Savings, AccountKind::Checking] {
        let rows: Vec<AccountDetails> = read_file(config, kind.stem())?;
        accounts.extend(rows.into_iter().map(|mut details| {
            details.balance.rescale(SIGNIFICANT_DIGITS);
            Account::new(kind, details)
        }));
    }
    let mut register_entries: Vec<RegisterEntry> = read_file(config, "register")?;
    for entry in &mut register_entries {
        entry.amount.rescale(SIGNIFICANT_DIGITS);
    }
    let snapshot = Snapshot {
        owners,
        accounts,
        register_entries,
    };
    info!("Loaded {} from {}", snapshot.counts(), config.dir.display());
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use crate::{
        data::{AccountDetails, RegisterEntry},
        read::read_records,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn read_register() {
        let register_csv = b"\
id, account_id, entry_name,   amount,  date
1,  10,         Paycheck,     1500.00, 2023-01-15
2,  10,         Groceries,    -82.17,  2023-01-16
3,  11,         Transfer in,  250,     2023-02-01
";
        let entries: Vec<RegisterEntry> = read_records(&register_csv[..]).unwrap();
        assert_eq!(
            entries,
            [
                RegisterEntry {
                    id: 1,
                    account_id: 10,
                    entry_name: "Paycheck".into(),
                    amount: dec!(1500.00),
                    date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                },
                RegisterEntry {
                    id: 2,
                    account_id: 10,
                    entry_name: "Groceries".into(),
                    amount: dec!(-82.17),
                    date: NaiveDate::from_ymd_opt(2023, 1, 16).unwrap(),
                },
                RegisterEntry {
                    id: 3,
                    account_id: 11,
                    entry_name: "Transfer in".into(),
                    amount: dec!(250),
                    date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                },
            ]
        )
    }

    #[test]
    fn read_accounts() {
        let accounts_csv = b"\
id, owner_id, name,      balance
10, 5,        Rainy day, 100.0
";
        let accounts: Vec<AccountDetails> = read_records(&accounts_csv[..]).unwrap();
        assert_eq!(
            accounts,
            [AccountDetails {
                id: 10,
                owner_id: 5,
                name: "Rainy day".into(),
                balance: dec!(100.0),
            }]
        );
    }

    #[test]
    fn bad_date_is_an_error() {
        let register_csv = b"\
id,account_id,entry_name,amount,date
1,10,Paycheck,1500.00,15/01/2023
";
        assert!(read_records::<_, RegisterEntry>(&register_csv[..]).is_err());
    }
}
