use crate::data::{AccountId, Error, OwnerId};
use std::collections::HashMap;

pub const OWNER_ID_OFFSET: OwnerId = 1000;
pub const ACCOUNT_ID_OFFSET: AccountId = 2000;

pub(crate) fn remap_owner_id(id: OwnerId) -> Result<OwnerId, Error> {
    id.checked_add(OWNER_ID_OFFSET).ok_or(Error::IdOutOfRange(id))
}

pub(crate) fn remap_account_id(id: AccountId) -> Result<AccountId, Error> {
    id.checked_add(ACCOUNT_ID_OFFSET).ok_or(Error::IdOutOfRange(id))
}

/// Old to new id tables for a single run. They fill up as owners and accounts get
/// remapped, and dependent records look their foreign keys up here; a miss means
/// the source snapshot is broken.
#[derive(Debug, Default)]
pub(crate) struct IdMap {
    owners: HashMap<OwnerId, OwnerId>,
    accounts: HashMap<AccountId, AccountId>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remap_owner(&mut self, id: OwnerId) -> Result<OwnerId, Error> {
        let new_id = remap_owner_id(id)?;
        if self.owners.insert(id, new_id).is_some() {
            return Err(Error::DuplicateOwner(id));
        }
        Ok(new_id)
    }

    pub fn remap_account(&mut self, id: AccountId) -> Result<AccountId, Error> {
        let new_id = remap_account_id(id)?;
        if self.accounts.insert(id, new_id).is_some() {
            return Err(Error::DuplicateAccount(id));
        }
        Ok(new_id)
    }

    pub fn owner(&self, id: OwnerId) -> Option<OwnerId> {
        self.owners.get(&id).copied()
    }

    pub fn account(&self, id: AccountId) -> Option<AccountId> {
        self.accounts.get(&id).copied()
    }

    pub fn sizes(&self) -> (usize, usize) {
        (self.owners.len(), self.accounts.len())
    }
}
