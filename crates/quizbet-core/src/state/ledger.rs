use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Balances keyed by student display name.
///
/// Missing names read as a zero balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(IndexMap<String, i64>);

impl Ledger {
    /// Get the balance of `name`.
    pub fn balance(&self, name: &str) -> i64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Returns whether `name` has an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert `amount` for `name` unless an entry exists. Returns the resulting balance.
    pub fn init_if_absent(&mut self, name: &str, amount: i64) -> i64 {
        *self.0.entry(name.to_owned()).or_insert(amount)
    }

    fn entry_mut(&mut self, name: &str) -> &mut i64 {
        self.0.entry(name.to_owned()).or_insert(0)
    }

    /// Add `amount` to the balance of `name`. Returns the new balance.
    pub fn credit(&mut self, name: &str, amount: i64) -> i64 {
        let balance = self.entry_mut(name);
        *balance = balance.saturating_add(amount);
        *balance
    }

    /// Subtract `amount` from the balance of `name`. Returns the new balance.
    pub fn debit(&mut self, name: &str, amount: i64) -> i64 {
        self.credit(name, amount.saturating_neg())
    }

    /// Overwrite the balance of `name`.
    pub fn set(&mut self, name: &str, amount: i64) {
        *self.entry_mut(name) = amount;
    }

    /// Iterate entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, balance)| (name.as_str(), *balance))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Ledger {
    fn from_iter<T: IntoIterator<Item = (S, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_keeps_existing_balance() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.init_if_absent("Kim", 100), 100);
        ledger.debit("Kim", 40);
        assert_eq!(ledger.init_if_absent("Kim", 100), 60);
    }

    #[test]
    fn missing_names_read_as_zero() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.balance("Lee"), 0);
        assert!(!ledger.contains("Lee"));
        assert_eq!(ledger.credit("Lee", 15), 15);
        assert!(ledger.contains("Lee"));
    }

    #[test]
    fn key_order_survives_json() {
        let ledger: Ledger = [("Park", 5), ("Kim", 10), ("Choi", 1)].into_iter().collect();
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"Park":5,"Kim":10,"Choi":1}"#);
        let back: Ledger = serde_json::from_str(&json).unwrap();
        let names = back.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, ["Park", "Kim", "Choi"]);
    }
}
