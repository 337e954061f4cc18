//! Rejection reason drafts
//!
//! Typing only edits a local draft. A status update is produced on an
//! explicit confirmation (Enter), never per keystroke.

use std::collections::HashMap;

use super::models::StatusUpdate;
use super::types::StudentId;

/// Key input relevant to the reason field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Escape,
    Enter,
}

/// Per-student reason drafts
#[derive(Debug, Clone, Default)]
pub struct ReasonEditor {
    drafts: HashMap<StudentId, String>,
}

impl ReasonEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft for a student
    pub fn draft(&self, id: &StudentId) -> &str {
        self.drafts.get(id).map(String::as_str).unwrap_or("")
    }

    /// Seed the draft, e.g. with a reason already stored on the record
    pub fn set_draft(&mut self, id: &StudentId, text: &str) {
        self.drafts.insert(id.clone(), text.to_string());
    }

    /// Feed one key. Returns the update to submit when the key confirms a
    /// non-empty draft; the draft is cleared on submission.
    pub fn key(&mut self, id: &StudentId, key: KeyInput) -> Option<StatusUpdate> {
        match key {
            KeyInput::Char(c) => {
                self.drafts.entry(id.clone()).or_default().push(c);
                None
            }
            KeyInput::Backspace => {
                if let Some(draft) = self.drafts.get_mut(id) {
                    draft.pop();
                }
                None
            }
            KeyInput::Escape => {
                self.drafts.remove(id);
                None
            }
            KeyInput::Enter => {
                let text = self.drafts.get(id).map(|d| d.trim().to_string())?;
                if text.is_empty() {
                    return None;
                }
                self.drafts.remove(id);
                Some(StatusUpdate::rejection(&text))
            }
        }
    }

    /// Feed a whole typed line followed by Enter
    pub fn submit_line(&mut self, id: &StudentId, line: &str) -> Option<StatusUpdate> {
        for c in line.chars().filter(|c| *c != '\n' && *c != '\r') {
            self.key(id, KeyInput::Char(c));
        }
        self.key(id, KeyInput::Enter)
    }
}
