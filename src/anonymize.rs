use crate::{
    balance::repair_balances,
    data::{Account, AccountDetails, Error, Owner, RegisterEntry, Snapshot},
    mask::{account_name, mask_ssn, Masker},
    perturb::{perturb_amount, perturb_date},
    remap::IdMap,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

/// Turns a production snapshot into one that is safe for integration tests. The
/// random generator is the only state kept across calls; id tables, name map and
/// balance totals all live inside a single `anonymize` call.
///
/// One instance per thread: nothing here is shared.
#[derive(Debug)]
pub(crate) struct Anonymizer<R> {
    rng: R,
}

impl Anonymizer<StdRng> {
    /// Seeded from the OS, so two runs never produce the same output.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl<R: Rng> Anonymizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Owners first, then accounts, then register entries: each step needs the id
    /// table the previous one filled. Balances are rebuilt last from the perturbed
    /// ledger. The input is left untouched and nothing is returned on error.
    pub fn anonymize(&mut self, snapshot: &Snapshot) -> Result<Snapshot, Error> {
        let mut ids = IdMap::new();
        let mut masker = Masker::new();

        let mut owners = Vec::with_capacity(snapshot.owners.len());
        for owner in &snapshot.owners {
            owners.push(self.owner(owner, &mut ids, &mut masker)?);
        }
        let mut accounts = Vec::with_capacity(snapshot.accounts.len());
        for account in &snapshot.accounts {
            accounts.push(Self::account(account, &mut ids)?);
        }
        let mut register_entries = Vec::with_capacity(snapshot.register_entries.len());
        for entry in &snapshot.register_entries {
            register_entries.push(self.register_entry(entry, &ids)?);
        }
        repair_balances(&mut accounts, &register_entries)?;

        let (owner_ids, account_ids) = ids.sizes();
        debug!(
            owner_ids,
            account_ids,
            distinct_names = masker.distinct_names(),
            "Anonymization tables built"
        );
        Ok(Snapshot {
            owners,
            accounts,
            register_entries,
        })
    }

    fn owner(
        &mut self,
        owner: &Owner,
        ids: &mut IdMap,
        masker: &mut Masker,
    ) -> Result<Owner, Error> {
        Ok(Owner {
            id: ids.remap_owner(owner.id)?,
            name: masker.person_name(&owner.name),
            dob: perturb_date(&mut self.rng, owner.dob)?,
            ssn: mask_ssn(owner.id, &owner.ssn)?,
            ..owner.clone()
        })
    }

    fn account(account: &Account, ids: &mut IdMap) -> Result<Account, Error> {
        let owner_id = ids
            .owner(account.owner_id())
            .ok_or(Error::BrokenOwnerReference {
                account: account.id(),
                owner: account.owner_id(),
            })?;
        let id = ids.remap_account(account.id())?;
        Ok(Account::new(
            account.kind(),
            AccountDetails {
                id,
                owner_id,
                name: account_name(id),
                balance: account.balance(),
            },
        ))
    }

    fn register_entry(
        &mut self,
        entry: &RegisterEntry,
        ids: &IdMap,
    ) -> Result<RegisterEntry, Error> {
        let account_id = ids
            .account(entry.account_id)
            .ok_or(Error::BrokenAccountReference {
                entry: entry.id,
                account: entry.account_id,
            })?;
        Ok(RegisterEntry {
            account_id,
            amount: perturb_amount(&mut self.rng, entry.amount)?,
            date: perturb_date(&mut self.rng, entry.date)?,
            ..entry.clone()
        })
    }
}
