//! Priority-bucketed board projection.
//!
//! # Invariants
//! - Unchecked notes land in `todo`, checked notes in `done`.
//! - Each section lists High, then Medium, then Low priority.
//! - Insertion order is preserved within one priority.

use crate::model::note::{Note, Priority};
use std::fmt::Write;

/// Notes of one section grouped by priority, most urgent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub buckets: Vec<(Priority, Vec<Note>)>,
}

impl Section {
    fn collect_from<'a>(notes: impl Iterator<Item = &'a Note> + Clone) -> Self {
        let buckets = Priority::DESCENDING
            .iter()
            .map(|priority| {
                let bucket = notes
                    .clone()
                    .filter(|note| note.priority == *priority)
                    .cloned()
                    .collect::<Vec<_>>();
                (*priority, bucket)
            })
            .filter(|(_, bucket)| !bucket.is_empty())
            .collect();
        Self { buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Notes in display order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.buckets.iter().flat_map(|(_, bucket)| bucket.iter())
    }
}

/// Todo/done split of a note list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub todo: Section,
    pub done: Section,
}

impl Board {
    pub fn from_notes(notes: &[Note]) -> Self {
        Self {
            todo: Section::collect_from(notes.iter().filter(|note| !note.checked)),
            done: Section::collect_from(notes.iter().filter(|note| note.checked)),
        }
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

/// Renders the board as plain text for terminal output.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    render_section(&mut out, "To do", &board.todo, "done");
    render_section(&mut out, "Done", &board.done, "undone");
    out
}

fn render_section(out: &mut String, title: &str, section: &Section, action: &str) {
    let _ = writeln!(out, "{title} ({})", section.len());
    if section.is_empty() {
        let _ = writeln!(out, "  (empty)");
    }
    for (priority, bucket) in &section.buckets {
        for note in bucket {
            let _ = writeln!(
                out,
                "  [{}] {} {}  ({action}: toggle {})",
                priority_label(*priority),
                note.id,
                note.value,
                note.id
            );
            if let Some(details) = &note.details {
                let _ = writeln!(out, "        {details}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{render_board, Board};
    use crate::model::note::{Note, NoteId, Priority};

    fn note(id: u64, priority: Priority, checked: bool) -> Note {
        Note {
            id: NoteId::Remote(id),
            value: format!("note {id}"),
            details: None,
            priority,
            checked,
        }
    }

    #[test]
    fn board_splits_by_flag_and_orders_by_priority() {
        let notes = vec![
            note(1, Priority::Low, false),
            note(2, Priority::High, false),
            note(3, Priority::Medium, true),
            note(4, Priority::High, false),
            note(5, Priority::Low, true),
        ];

        let board = Board::from_notes(&notes);
        let todo_ids: Vec<_> = board.todo.notes().map(|n| n.id.clone()).collect();
        let done_ids: Vec<_> = board.done.notes().map(|n| n.id.clone()).collect();

        assert_eq!(
            todo_ids,
            vec![NoteId::Remote(2), NoteId::Remote(4), NoteId::Remote(1)]
        );
        assert_eq!(done_ids, vec![NoteId::Remote(3), NoteId::Remote(5)]);
        assert_eq!(board.todo.len() + board.done.len(), notes.len());
    }

    #[test]
    fn render_marks_empty_sections() {
        let text = render_board(&Board::from_notes(&[note(1, Priority::High, false)]));
        assert!(text.contains("To do (1)"));
        assert!(text.contains("[high] 1 note 1"));
        assert!(text.contains("Done (0)\n  (empty)"));
    }
}
