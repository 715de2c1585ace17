use crate::data::{AccountId, Error, OwnerId};
use std::collections::HashMap;

/// Number of trailing SSN characters left readable.
pub const SSN_VISIBLE_SUFFIX: usize = 4;
const SSN_MASK: &str = "***-**-";

/// Hands out `Person N` placeholders in iteration order. Every owner gets a fresh
/// number; `names` only remembers which placeholder an original name got first.
#[derive(Debug)]
pub(crate) struct Masker {
    counter: usize,
    names: HashMap<String, String>,
}

impl Masker {
    pub fn new() -> Self {
        Self {
            counter: 1,
            names: HashMap::new(),
        }
    }

    pub fn person_name(&mut self, original: &str) -> String {
        let name = format!("Person {}", self.counter);
        self.counter += 1;
        self.names
            .entry(original.to_owned())
            .or_insert_with(|| name.clone());
        name
    }

    pub fn distinct_names(&self) -> usize {
        self.names.len()
    }
}

/// Replace everything but the last four characters with `***-**-`.
pub(crate) fn mask_ssn(owner: OwnerId, ssn: &str) -> Result<String, Error> {
    let len = ssn.chars().count();
    if len < SSN_VISIBLE_SUFFIX {
        return Err(Error::MalformedSsn { owner });
    }
    let suffix: String = ssn.chars().skip(len - SSN_VISIBLE_SUFFIX).collect();
    Ok(format!("{SSN_MASK}{suffix}"))
}

pub(crate) fn account_name(id: AccountId) -> String {
    format!("Account {id}")
}

#[cfg(test)]
mod tests {
    use super::{account_name, mask_ssn, Masker};
    use crate::data::Error;

    #[test]
    fn sequential_person_names() {
        let mut masker = Masker::new();
        assert_eq!(masker.person_name("Alice Smith"), "Person 1");
        assert_eq!(masker.person_name("Bob Jones"), "Person 2");
        assert_eq!(masker.person_name("Alice Smith"), "Person 3");
        assert_eq!(masker.names["Alice Smith"], "Person 1");
        assert_eq!(masker.distinct_names(), 2);
    }

    #[test]
    fn ssn_keeps_last_four() {
        assert_eq!(mask_ssn(1, "123-45-6789"), Ok("***-**-6789".to_owned()));
        assert_eq!(mask_ssn(1, "123456789"), Ok("***-**-6789".to_owned()));
        assert_eq!(mask_ssn(1, "6789"), Ok("***-**-6789".to_owned()));
    }

    #[test]
    fn ssn_too_short() {
        assert_eq!(mask_ssn(7, "789"), Err(Error::MalformedSsn { owner: 7 }));
        assert_eq!(mask_ssn(7, ""), Err(Error::MalformedSsn { owner: 7 }));
    }

    #[test]
    fn account_name_from_id() {
        assert_eq!(account_name(2010), "Account 2010");
    }
}
