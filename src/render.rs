//! Plain-text rendering of the roster table

use feestatus_core::{Action, Column, Lenient, Officer, SortState, Student};
use feestatus_utils::{format_number, truncate};

const MAX_WIDTH: usize = 28;

/// Header line for the signed-in officer
pub fn officer_header(officer: &Officer) -> String {
    match &officer.designation {
        Some(designation) => format!("{} ({}) <{}>", officer.name, designation, officer.email),
        None => format!("{} <{}>", officer.name, officer.email),
    }
}

fn cell(student: &Student, column: Column) -> String {
    match column {
        Column::EnrollmentNo => student.enrollment_no.to_string(),
        Column::FullName => student.full_name.clone(),
        Column::Email => student.email.clone(),
        Column::Mobile => student.mobile.to_string(),
        Column::Year => student.year.as_ref().map(|y| y.to_string()).unwrap_or_default(),
        Column::ModeOfPayment => student.payment_mode.clone(),
        Column::Amount => match &student.amount {
            Some(Lenient::Value(amount)) => format_number(amount),
            Some(Lenient::Raw(raw)) => raw.clone(),
            None => String::new(),
        },
        Column::FeeStatus => student.fee_status.as_ref().map(|s| s.to_string()).unwrap_or_default(),
    }
}

fn decision(student: &Student) -> String {
    match student.remarks {
        Some(Action::Accept) => "accepted".to_string(),
        Some(Action::Reject) => match student.rejection_reason() {
            Some(reason) => format!("rejected: {}", reason),
            None => "rejected".to_string(),
        },
        None => "-".to_string(),
    }
}

/// Render `students` in the order given, with the sort arrow on the
/// active column
pub fn roster_table(officer: &Officer, students: &[Student], sort: SortState) -> String {
    let mut headers: Vec<String> = vec!["ID".to_string()];
    headers.extend(
        Column::ALL
            .iter()
            .map(|c| format!("{}{}", c.label(), sort.indicator(*c))),
    );
    headers.push("Remarks".to_string());
    headers.push("Proof".to_string());

    let rows: Vec<Vec<String>> = students
        .iter()
        .map(|s| {
            let mut row = vec![s.id.to_string()];
            row.extend(Column::ALL.iter().map(|c| truncate(&cell(s, *c), MAX_WIDTH)));
            row.push(truncate(&decision(s), MAX_WIDTH));
            row.push(if s.proof_reference().is_some() { "yes" } else { "-" }.to_string());
            row
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&officer_header(officer));
    out.push('\n');
    out.push_str(&format!("Fee Status ({} students)\n\n", students.len()));
    out.push_str(&format_row(&headers, &widths));
    out.push_str(&format_row(
        &widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>(),
        &widths,
    ));
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(v, w)| {
            let pad = w.saturating_sub(v.chars().count());
            format!("{}{}", v, " ".repeat(pad))
        })
        .collect();
    format!("{}\n", cells.join("  ").trim_end())
}

/// One-line summary after a decision was applied
pub fn decision_line(student: &Student) -> String {
    format!(
        "{} {} ({}): {}",
        student.id,
        student.full_name,
        student.enrollment_no,
        decision(student)
    )
}
