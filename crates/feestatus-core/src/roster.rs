//! Keyed roster of student records

use std::collections::HashMap;

use super::models::Student;
use super::types::StudentId;

/// Ordered mapping from student id to record.
///
/// Insertion order is kept so unsorted views and sort ties are
/// reproducible. `merge` replaces exactly one entry in place.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    order: Vec<StudentId>,
    records: HashMap<StudentId, Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from a loaded list. A repeated id keeps the
    /// position of its first occurrence and the content of its last.
    pub fn from_records(records: Vec<Student>) -> Self {
        let mut roster = Self::new();
        roster.replace_all(records);
        roster
    }

    /// Replace the whole roster
    pub fn replace_all(&mut self, records: Vec<Student>) {
        self.order.clear();
        self.records.clear();
        for record in records {
            if !self.records.contains_key(&record.id) {
                self.order.push(record.id.clone());
            }
            self.records.insert(record.id.clone(), record);
        }
    }

    /// Replace the record with the same id. Returns `false` and leaves the
    /// roster untouched when the id is unknown.
    pub fn merge(&mut self, record: Student) -> bool {
        match self.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &StudentId) -> Option<&Student> {
        self.records.get(id)
    }

    /// Find an id by its textual form, as typed on the command line
    pub fn resolve(&self, key: &str) -> Option<&StudentId> {
        let key = key.trim();
        self.order.iter().find(|id| id.to_string() == key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }

    /// Owned copy of the records in insertion order
    pub fn to_vec(&self) -> Vec<Student> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;
    use pretty_assertions::assert_eq;

    fn student(id: i64, name: &str) -> Student {
        let mut s = Student::new(id);
        s.full_name = name.to_string();
        s
    }

    #[test]
    fn test_merge_replaces_only_matching_record() {
        let mut roster = Roster::from_records(vec![student(1, "Bob"), student(2, "Amy")]);
        let bob_before = roster.get(&StudentId::Number(1)).cloned();

        let mut updated = student(2, "Amy");
        updated.remarks = Some(Action::Reject);
        updated.reason = Some("missing receipt".to_string());
        assert!(roster.merge(updated.clone()));

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(&StudentId::Number(2)), Some(&updated));
        assert_eq!(roster.get(&StudentId::Number(1)).cloned(), bob_before);
        let order: Vec<&str> = roster.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(order, vec!["Bob", "Amy"]);
    }

    #[test]
    fn test_merge_unknown_id_is_rejected() {
        let mut roster = Roster::from_records(vec![student(1, "Bob")]);
        assert!(!roster.merge(student(9, "Zed")));
        assert_eq!(roster.len(), 1);
        assert!(roster.get(&StudentId::Number(9)).is_none());
    }

    #[test]
    fn test_merges_commute() {
        let base = vec![student(1, "Bob"), student(2, "Amy")];
        let mut a = student(1, "Bob");
        a.remarks = Some(Action::Accept);
        let mut b = student(2, "Amy");
        b.remarks = Some(Action::Reject);

        let mut left = Roster::from_records(base.clone());
        left.merge(a.clone());
        left.merge(b.clone());

        let mut right = Roster::from_records(base);
        right.merge(b);
        right.merge(a);

        assert_eq!(left.to_vec(), right.to_vec());
    }

    #[test]
    fn test_duplicate_ids_in_load() {
        let roster = Roster::from_records(vec![student(1, "Old"), student(2, "Amy"), student(1, "New")]);
        let names: Vec<&str> = roster.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, vec!["New", "Amy"]);
    }

    #[test]
    fn test_resolve_by_text() {
        let roster = Roster::from_records(vec![student(12, "Bob"), Student::new("S-7")]);
        assert_eq!(roster.resolve("12"), Some(&StudentId::Number(12)));
        assert_eq!(roster.resolve(" S-7 "), Some(&StudentId::Text("S-7".to_string())));
        assert_eq!(roster.resolve("13"), None);
    }

    #[test]
    fn test_replace_all_clears_previous() {
        let mut roster = Roster::from_records(vec![student(1, "Bob")]);
        roster.replace_all(vec![]);
        assert!(roster.is_empty());
    }
}
