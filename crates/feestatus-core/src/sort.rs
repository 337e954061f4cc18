//! Column sorting for the roster table
//!
//! `sort` is a pure function of its inputs: it never touches the slice it
//! is given and always returns a fresh ordering. `toggle` is the header
//! click state transition.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::models::Student;
use super::types::{Lenient, Scalar};
pub use feestatus_config::SortDirection;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    EnrollmentNo,
    FullName,
    Email,
    Mobile,
    Year,
    ModeOfPayment,
    Amount,
    FeeStatus,
}

impl Column {
    /// All columns in table order
    pub const ALL: [Column; 8] = [
        Column::EnrollmentNo,
        Column::FullName,
        Column::Email,
        Column::Mobile,
        Column::Year,
        Column::ModeOfPayment,
        Column::Amount,
        Column::FeeStatus,
    ];

    /// Key used in configuration and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Column::EnrollmentNo => "enrollmentNo",
            Column::FullName => "fullName",
            Column::Email => "email",
            Column::Mobile => "mobile",
            Column::Year => "year",
            Column::ModeOfPayment => "modeOfPayment",
            Column::Amount => "amount",
            Column::FeeStatus => "feeStatus",
        }
    }

    /// Table header label
    pub fn label(&self) -> &'static str {
        match self {
            Column::EnrollmentNo => "Enrollment No.",
            Column::FullName => "Full Name",
            Column::Email => "Email",
            Column::Mobile => "Mobile",
            Column::Year => "Year",
            Column::ModeOfPayment => "Mode of Payment",
            Column::Amount => "Amount",
            Column::FeeStatus => "Fee Status",
        }
    }

    /// Extract the comparison key for this column
    pub fn sort_key(&self, student: &Student) -> SortKey {
        match self {
            Column::EnrollmentNo => SortKey::scalar(&student.enrollment_no),
            Column::FullName => SortKey::text(&student.full_name),
            Column::Email => SortKey::text(&student.email),
            Column::Mobile => SortKey::scalar(&student.mobile),
            Column::Year => SortKey::numeric(&student.year),
            Column::ModeOfPayment => SortKey::text(&student.payment_mode),
            Column::Amount => SortKey::numeric(&student.amount),
            Column::FeeStatus => student
                .fee_status
                .as_ref()
                .map_or(SortKey::Empty, |status| SortKey::text(status.as_str())),
        }
    }
}

impl Default for Column {
    fn default() -> Self {
        Column::EnrollmentNo
    }
}

impl std::str::FromStr for Column {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Invalid sort column: {}", s))
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Comparison key extracted from one record
///
/// Missing values sort before numbers, numbers before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Empty,
    Number(Decimal),
    Text(String),
}

impl SortKey {
    fn text(value: &str) -> Self {
        if value.is_empty() {
            SortKey::Empty
        } else {
            SortKey::Text(value.to_string())
        }
    }

    /// Numbers compare numerically, text lexicographically
    fn scalar(value: &Scalar) -> Self {
        match value {
            Scalar::Number(n) => {
                let text = n.to_string();
                Decimal::from_str_exact(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(SortKey::Number)
                    .unwrap_or(SortKey::Text(text))
            }
            Scalar::Text(s) => SortKey::text(s),
        }
    }

    /// Parsed values compare numerically; unparsed text sorts after them
    fn numeric<T: Clone + Into<Decimal>>(value: &Option<Lenient<T>>) -> Self {
        match value {
            Some(Lenient::Value(v)) => SortKey::Number(v.clone().into()),
            Some(Lenient::Raw(raw)) => SortKey::text(raw),
            None => SortKey::Empty,
        }
    }
}

/// Active column and direction of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: Column, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click transition
    pub fn toggle(self, clicked: Column) -> Self {
        toggle(self, clicked)
    }

    /// Header arrow for `column`: shown only on the active column
    pub fn indicator(&self, column: Column) -> &'static str {
        if column != self.column {
            return "";
        }
        match self.direction {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Clicking the active column flips direction; any other column
/// becomes active in ascending order.
pub fn toggle(current: SortState, clicked: Column) -> SortState {
    if clicked == current.column {
        SortState::new(clicked, current.direction.flipped())
    } else {
        SortState::new(clicked, SortDirection::Asc)
    }
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Return a new ordering of `records` by `column`. Stable: ties keep input order.
pub fn sort(records: &[Student], column: Column, direction: SortDirection) -> Vec<Student> {
    let mut keyed: Vec<(SortKey, &Student)> = records
        .iter()
        .map(|s| (column.sort_key(s), s))
        .collect();
    keyed.sort_by(|a, b| apply_direction(a.0.cmp(&b.0), direction));
    keyed.into_iter().map(|(_, s)| s.clone()).collect()
}

/// Sort by a raw column key. Unknown keys tie everything, so the input
/// order is returned unchanged.
pub fn sort_by_key_name(records: &[Student], key: &str, direction: SortDirection) -> Vec<Student> {
    match key.parse::<Column>() {
        Ok(column) => sort(records, column, direction),
        Err(_) => {
            log::debug!(target: "feestatus::sort", "Unknown sort column '{}', keeping order", key);
            records.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeeStatus, Lenient, Scalar, StudentId};
    use pretty_assertions::assert_eq;

    fn student(id: i64, name: &str, year: i32) -> Student {
        let mut s = Student::new(id);
        s.full_name = name.to_string();
        s.year = Some(Lenient::Value(year));
        s
    }

    fn ids(records: &[Student]) -> Vec<StudentId> {
        records.iter().map(|s| s.id.clone()).collect()
    }

    fn roster() -> Vec<Student> {
        vec![student(1, "Bob", 2), student(2, "Amy", 1)]
    }

    #[test]
    fn test_sort_by_full_name_asc() {
        let sorted = sort(&roster(), Column::FullName, SortDirection::Asc);
        let names: Vec<&str> = sorted.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Bob"]);
    }

    #[test]
    fn test_sort_by_year_desc() {
        let sorted = sort(&roster(), Column::Year, SortDirection::Desc);
        assert_eq!(ids(&sorted), vec![StudentId::Number(1), StudentId::Number(2)]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = roster();
        let before = input.clone();
        let _ = sort(&input, Column::FullName, SortDirection::Asc);
        assert_eq!(input, before);
    }

    #[test]
    fn test_desc_is_reverse_of_asc_without_ties() {
        let records = vec![
            student(1, "Chen", 3),
            student(2, "Amy", 1),
            student(3, "Dara", 4),
            student(4, "Bob", 2),
        ];
        for column in [Column::FullName, Column::Year] {
            let mut asc = sort(&records, column, SortDirection::Asc);
            let desc = sort(&records, column, SortDirection::Desc);
            asc.reverse();
            assert_eq!(ids(&asc), ids(&desc), "column {}", column);
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let records = vec![student(1, "Chen", 3), student(2, "Amy", 1), student(3, "Amy", 2)];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let once = sort(&records, Column::FullName, direction);
            let twice = sort(&once, Column::FullName, direction);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![student(1, "Amy", 2), student(2, "Amy", 1), student(3, "Amy", 3)];
        let asc = sort(&records, Column::FullName, SortDirection::Asc);
        let desc = sort(&records, Column::FullName, SortDirection::Desc);
        assert_eq!(ids(&asc), ids(&records));
        assert_eq!(ids(&desc), ids(&records));
    }

    #[test]
    fn test_amount_sorts_numerically() {
        let mut a = Student::new(1);
        a.amount = Some(Lenient::Value(Decimal::from(900)));
        let mut b = Student::new(2);
        b.amount = Some(Lenient::Value(Decimal::from(10000)));
        let c = Student::new(3);

        let sorted = sort(&[a, b, c], Column::Amount, SortDirection::Asc);
        assert_eq!(ids(&sorted), vec![StudentId::Number(3), StudentId::Number(1), StudentId::Number(2)]);
    }

    #[test]
    fn test_fee_status_sorts_by_label() {
        let mut a = Student::new(1);
        a.fee_status = Some(FeeStatus::Pending);
        let mut b = Student::new(2);
        b.fee_status = Some(FeeStatus::Overdue);
        let mut c = Student::new(3);
        c.fee_status = Some(FeeStatus::Paid);
        let d = Student::new(4);

        let sorted = sort(&[a, b, c, d], Column::FeeStatus, SortDirection::Asc);
        assert_eq!(
            ids(&sorted),
            vec![StudentId::Number(4), StudentId::Number(2), StudentId::Number(3), StudentId::Number(1)]
        );
    }

    #[test]
    fn test_numeric_enrollment_numbers_sort_numerically() {
        let mut a = Student::new(1);
        a.enrollment_no = Scalar::from(1001);
        let mut b = Student::new(2);
        b.enrollment_no = Scalar::from(999);
        let mut c = Student::new(3);
        c.enrollment_no = Scalar::from("B10");
        let mut d = Student::new(4);
        d.enrollment_no = Scalar::from("B9");

        let sorted = sort(&[a, b, c, d], Column::EnrollmentNo, SortDirection::Asc);
        assert_eq!(
            ids(&sorted),
            vec![StudentId::Number(2), StudentId::Number(1), StudentId::Number(3), StudentId::Number(4)]
        );
    }

    #[test]
    fn test_unparsed_year_sorts_after_numbers() {
        let mut raw = Student::new(1);
        raw.year = Some(Lenient::Raw("Second".to_string()));
        let records = vec![raw, student(2, "Amy", 3), Student::new(3)];

        let sorted = sort(&records, Column::Year, SortDirection::Asc);
        assert_eq!(ids(&sorted), vec![StudentId::Number(3), StudentId::Number(2), StudentId::Number(1)]);
    }

    #[test]
    fn test_unknown_column_keeps_order() {
        let records = roster();
        let sorted = sort_by_key_name(&records, "Amount2", SortDirection::Desc);
        assert_eq!(sorted, records);

        let by_key = sort_by_key_name(&records, "modeOfPayment", SortDirection::Asc);
        assert_eq!(by_key.len(), 2);
    }

    #[test]
    fn test_toggle() {
        let current = SortState::new(Column::FullName, SortDirection::Asc);
        assert_eq!(toggle(current, Column::FullName), SortState::new(Column::FullName, SortDirection::Desc));
        assert_eq!(
            toggle(SortState::new(Column::FullName, SortDirection::Desc), Column::FullName),
            SortState::new(Column::FullName, SortDirection::Asc)
        );
        assert_eq!(toggle(SortState::new(Column::FullName, SortDirection::Desc), Column::Year),
            SortState::new(Column::Year, SortDirection::Asc));
    }

    #[test]
    fn test_indicator() {
        let state = SortState::new(Column::Amount, SortDirection::Desc);
        assert_eq!(state.indicator(Column::Amount), "↓");
        assert_eq!(state.indicator(Column::Year), "");
        assert_eq!(SortState::default().indicator(Column::EnrollmentNo), "↑");
    }

    #[test]
    fn test_column_keys_match_config() {
        let keys: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, feestatus_config::SORT_COLUMN_KEYS.to_vec());
        assert_eq!("modeofpayment".parse::<Column>().unwrap(), Column::ModeOfPayment);
    }
}
