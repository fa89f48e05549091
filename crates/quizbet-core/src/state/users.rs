use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Student ID, the primary key of the user directory.
pub type StudentId = String;

/// Credentials of a registered student.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name, also the ledger key.
    pub name: String,
    /// Plaintext password.
    pub password: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Student {
    /// Student ID.
    pub id: StudentId,
    /// Display name.
    pub name: String,
}

/// Registered students keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDirectory(IndexMap<StudentId, UserRecord>);

impl UserDirectory {
    /// Get a student by ID.
    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.0.get(id)
    }

    /// Insert or replace a student. Returns the previous record.
    pub fn upsert(&mut self, id: StudentId, record: UserRecord) -> Option<UserRecord> {
        self.0.insert(id, record)
    }

    /// Match the `(id, name, password)` triple exactly.
    pub fn authenticate(&self, id: &str, name: &str, password: &str) -> Option<Student> {
        let record = self.0.get(id)?;
        (record.name == name && record.password == password).then(|| Student {
            id: id.to_owned(),
            name: record.name.clone(),
        })
    }

    /// Iterate students in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&StudentId, &UserRecord)> {
        self.0.iter()
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no student is registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        let mut users = UserDirectory::default();
        users.upsert(
            "1001".into(),
            UserRecord {
                name: "Kim".into(),
                password: "pw1".into(),
            },
        );
        users
    }

    #[test]
    fn authenticate_requires_full_match() {
        let users = directory();
        assert_eq!(
            users.authenticate("1001", "Kim", "pw1"),
            Some(Student {
                id: "1001".into(),
                name: "Kim".into()
            })
        );
        assert!(users.authenticate("1001", "Kim", "nope").is_none());
        assert!(users.authenticate("1001", "Lee", "pw1").is_none());
        assert!(users.authenticate("1002", "Kim", "pw1").is_none());
    }

    #[test]
    fn password_is_not_printed() {
        let users = directory();
        let debug = format!("{:?}", users.get("1001").unwrap());
        assert!(!debug.contains("pw1"));
    }

    #[test]
    fn document_layout() {
        let users = directory();
        assert_eq!(
            serde_json::to_string(&users).unwrap(),
            r#"{"1001":{"name":"Kim","password":"pw1"}}"#
        );
    }
}
