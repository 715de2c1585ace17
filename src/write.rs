use crate::{
    config::PersisterConfig,
    data::{AccountKind, Snapshot},
};
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use tracing::info;

/// Basic CSV exporter for any record type
pub(crate) fn write_records<'a, W, T, I>(writer: W, records: I) -> Result<(), anyhow::Error>
where
    W: std::io::Write,
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_file<'a, T, I>(
    config: &PersisterConfig,
    stem: &str,
    records: I,
) -> Result<(), anyhow::Error>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let path = config.path(stem);
    let file = File::create(&path).with_context(|| format!("can't create {}", path.display()))?;
    write_records(file, records).with_context(|| format!("can't write {}", path.display()))
}

/// Mirror of `load_snapshot`: accounts are split back into one file per variant.
pub(crate) fn save_snapshot(
    config: &PersisterConfig,
    snapshot: &Snapshot,
) -> Result<(), anyhow::Error> {
    write_file(config, "owners", &snapshot.owners)?;
    for kind in [AccountKind::Savings, AccountKind::Checking] {
        let rows = snapshot
            .accounts
            .iter()
            .filter(|account| account.kind() == kind)
            .map(|account| account.details());
        write_file(config, kind.stem(), rows)?;
    }
    write_file(config, "register", &snapshot.register_entries)?;
    info!("Saved {} to {}", snapshot.counts(), config.dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        config::PersisterConfig,
        data::{Account, AccountDetails, AccountKind, Owner, RegisterEntry, Snapshot},
        read::load_snapshot,
        write::{save_snapshot, write_records},
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::fs;

    fn details(id: i64, balance: rust_decimal::Decimal) -> AccountDetails {
        AccountDetails {
            id,
            owner_id: 1005,
            name: format!("Account {id}"),
            balance,
        }
    }

    #[test]
    fn write_accounts() {
        let mut out = Vec::new();
        write_records(&mut out, &[details(2010, dec!(99.2346))]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,owner_id,name,balance\n2010,1005,Account 2010,99.2346\n"
        );
    }

    #[test]
    fn nothing_to_write() {
        let mut out = Vec::new();
        write_records::<_, AccountDetails, _>(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersisterConfig {
            dir: dir.path().to_owned(),
            suffix: "_prod".into(),
        };
        let snapshot = Snapshot {
            owners: vec![Owner {
                id: 1005,
                name: "Person 1".into(),
                dob: NaiveDate::from_ymd_opt(1980, 3, 12).unwrap(),
                ssn: "***-**-6789".into(),
                address: "1 Main St".into(),
                address2: "Apt 2, rear".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip: "62701".into(),
            }],
            accounts: vec![
                Account::new(AccountKind::Savings, details(2010, dec!(99.2346))),
                Account::new(AccountKind::Checking, details(2011, dec!(0.0000))),
            ],
            register_entries: vec![RegisterEntry {
                id: 1,
                account_id: 2010,
                entry_name: "Paycheck".into(),
                amount: dec!(99.2346),
                date: NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
            }],
        };

        save_snapshot(&config, &snapshot).unwrap();

        let checking = fs::read_to_string(dir.path().join("checking_prod.csv")).unwrap();
        assert_eq!(
            checking,
            "id,owner_id,name,balance\n2011,1005,Account 2011,0.0000\n"
        );
        assert_eq!(load_snapshot(&config).unwrap(), snapshot);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PersisterConfig {
            dir: dir.path().to_owned(),
            suffix: String::new(),
        };
        let err = load_snapshot(&config).unwrap_err();
        assert!(err.to_string().contains("owners.csv"));
    }
}
