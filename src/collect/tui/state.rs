//! Browser state for the manifest TUI.
//!
//! Every key press becomes an [`Action`]; applying it mutates the answers
//! held in the groups and tells the event loop whether to keep going.

use super::{Action, Step};
use crate::collect::push_digit;
use crate::manifest::{Answers, AnswerValue, ManifestEntry, ManifestGroups};

const PAGE: isize = 10;

pub(super) struct Browser {
    pub(super) title: String,
    pub(super) groups: ManifestGroups,
    /// (group, entry) for every answerable row, in display order.
    rows: Vec<(usize, usize)>,
    selected: usize,
    pub(super) message: Option<String>,
    pub(super) show_help: bool,
}

impl Browser {
    pub(super) fn new(title: &str, groups: ManifestGroups) -> Self {
        let rows = groups
            .iter()
            .enumerate()
            .flat_map(|(g, group)| (0..group.entries.len()).map(move |e| (g, e)))
            .collect();
        Self {
            title: title.to_string(),
            groups,
            rows,
            selected: 0,
            message: None,
            show_help: false,
        }
    }

    pub(super) fn apply(&mut self, action: Action) -> Step {
        self.message = None;
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::Abort) {
                self.show_help = false;
                return Step::Continue;
            }
            self.show_help = false;
        }
        match action {
            Action::Up => self.move_selection(-1),
            Action::Down => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE),
            Action::PageDown => self.move_selection(PAGE),
            Action::NextSection => self.jump_section(true),
            Action::PrevSection => self.jump_section(false),
            Action::Yes => self.set_bool(|_| true),
            Action::No => self.set_bool(|_| false),
            Action::Toggle => self.set_bool(|current| !current.unwrap_or(false)),
            Action::Digit(digit) => self.push_digit(digit),
            Action::Backspace => self.pop_digit(),
            Action::Skip => {
                if let Some(entry) = self.selected_entry_mut() {
                    entry.value = None;
                }
            }
            Action::ToggleHelp => self.show_help = true,
            Action::Confirm => return Step::Confirm,
            Action::Abort => return Step::Abort,
        }
        Step::Continue
    }

    pub(super) fn into_answers(self) -> Answers {
        self.groups.answers()
    }

    /// (group, entry) of the highlighted row.
    pub(super) fn selected_position(&self) -> Option<(usize, usize)> {
        self.rows.get(self.selected).copied()
    }

    pub(super) fn answered_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter())
            .filter(|entry| entry.value.is_some())
            .count()
    }

    pub(super) fn entry_count(&self) -> usize {
        self.rows.len()
    }

    fn selected_entry_mut(&mut self) -> Option<&mut ManifestEntry> {
        let (g, e) = self.selected_position()?;
        self.groups.groups_mut().get_mut(g)?.entries.get_mut(e)
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = 0;
            return;
        }
        let max = self.rows.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    fn jump_section(&mut self, forward: bool) {
        let Some((group, _)) = self.selected_position() else {
            return;
        };
        let target = if forward {
            self.rows.iter().position(|(g, _)| *g > group)
        } else if group == 0 {
            None
        } else {
            self.rows.iter().position(|(g, _)| *g == group - 1)
        };
        match target {
            Some(idx) => self.selected = idx,
            None if forward => self.message = Some("already in the last section".to_string()),
            None => self.message = Some("already in the first section".to_string()),
        }
    }

    fn set_bool(&mut self, answer: impl FnOnce(Option<bool>) -> bool) {
        let Some(entry) = self.selected_entry_mut() else {
            return;
        };
        if !entry.is_bool() {
            self.message = Some("this question takes a number".to_string());
            return;
        }
        let current = match entry.value {
            Some(AnswerValue::Bool(flag)) => Some(flag),
            _ => None,
        };
        entry.value = Some(AnswerValue::Bool(answer(current)));
    }

    fn push_digit(&mut self, digit: u8) {
        let Some(entry) = self.selected_entry_mut() else {
            return;
        };
        if !entry.is_natural() {
            self.message = Some("this question takes yes or no".to_string());
            return;
        }
        let current = match entry.value {
            Some(AnswerValue::Natural(number)) => Some(number),
            _ => None,
        };
        match push_digit(current, digit) {
            Some(number) => entry.value = Some(AnswerValue::Natural(number)),
            None => self.message = Some("number too large".to_string()),
        }
    }

    fn pop_digit(&mut self) {
        let Some(entry) = self.selected_entry_mut() else {
            return;
        };
        if let Some(AnswerValue::Natural(number)) = entry.value {
            entry.value = (number >= 10).then_some(AnswerValue::Natural(number / 10));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ValueType;
    use crate::manifest::{ManifestEntry, DEFAULT_BOOL_PROMPT, DEFAULT_NATURAL_PROMPT};
    use serde_json::{json, Value};

    fn entry(id: &str, value_type: ValueType) -> ManifestEntry {
        ManifestEntry {
            id: id.to_string(),
            partial_id: id.to_string(),
            name: id.to_string(),
            value_type: Some(value_type),
            value: None,
        }
    }

    fn browser() -> Browser {
        let mut groups = ManifestGroups::default();
        groups.push(DEFAULT_BOOL_PROMPT.to_string(), entry("camera", ValueType::Bool));
        groups.push(DEFAULT_BOOL_PROMPT.to_string(), entry("hdmi", ValueType::Bool));
        groups.push(DEFAULT_NATURAL_PROMPT.to_string(), entry("usb_ports", ValueType::Natural));
        Browser::new("System Manifest:", groups)
    }

    fn apply_all(browser: &mut Browser, actions: &[Action]) -> Step {
        let mut step = Step::Continue;
        for action in actions {
            step = browser.apply(*action);
        }
        step
    }

    #[test]
    fn confirm_returns_every_entry_with_nulls_for_unanswered() {
        let mut browser = browser();
        let step = apply_all(&mut browser, &[Action::Yes, Action::Confirm]);
        assert_eq!(step, Step::Confirm);
        let answers = browser.into_answers();
        assert_eq!(
            serde_json::to_value(answers).unwrap(),
            json!({"camera": true, "hdmi": null, "usb_ports": null})
        );
    }

    #[test]
    fn abort_is_reported() {
        let mut browser = browser();
        assert_eq!(apply_all(&mut browser, &[Action::No, Action::Abort]), Step::Abort);
    }

    #[test]
    fn selection_is_clamped() {
        let mut browser = browser();
        browser.apply(Action::Up);
        assert_eq!(browser.selected_position(), Some((0, 0)));
        browser.apply(Action::PageDown);
        assert_eq!(browser.selected_position(), Some((1, 0)));
        browser.apply(Action::PageUp);
        assert_eq!(browser.selected_position(), Some((0, 0)));
    }

    #[test]
    fn section_jumps_land_on_first_entry() {
        let mut browser = browser();
        browser.apply(Action::Down);
        browser.apply(Action::NextSection);
        assert_eq!(browser.selected_position(), Some((1, 0)));
        browser.apply(Action::NextSection);
        assert_eq!(browser.selected_position(), Some((1, 0)));
        assert!(browser.message.is_some());
        browser.apply(Action::PrevSection);
        assert_eq!(browser.selected_position(), Some((0, 0)));
    }

    #[test]
    fn toggle_and_skip_booleans() {
        let mut browser = browser();
        browser.apply(Action::Toggle);
        assert_eq!(browser.answered_count(), 1);
        browser.apply(Action::Toggle);
        browser.apply(Action::Down);
        browser.apply(Action::Yes);
        browser.apply(Action::Skip);
        let answers = browser.into_answers();
        assert_eq!(answers["camera"], Value::Bool(false));
        assert_eq!(answers["hdmi"], Value::Null);
    }

    #[test]
    fn numeric_entries_take_digits_only() {
        let mut browser = browser();
        browser.apply(Action::Digit(3));
        assert_eq!(browser.answered_count(), 0);
        assert!(browser.message.is_some());

        browser.apply(Action::NextSection);
        apply_all(
            &mut browser,
            &[Action::Digit(1), Action::Digit(2), Action::Digit(7), Action::Backspace],
        );
        browser.apply(Action::Yes);
        assert_eq!(
            browser.message.as_deref(),
            Some("this question takes a number")
        );
        assert_eq!(browser.into_answers()["usb_ports"], json!(12));
    }

    #[test]
    fn backspace_on_single_digit_clears_answer() {
        let mut browser = browser();
        browser.apply(Action::NextSection);
        apply_all(&mut browser, &[Action::Digit(4), Action::Backspace]);
        assert_eq!(browser.answered_count(), 0);
    }

    #[test]
    fn help_swallows_the_next_abort() {
        let mut browser = browser();
        browser.apply(Action::ToggleHelp);
        assert!(browser.show_help);
        assert_eq!(browser.apply(Action::Abort), Step::Continue);
        assert!(!browser.show_help);
    }
}
