use std::fmt;

use crate::error::SelectionError;

/// One entry of an [`OptionSet`]: a player name or a chart-kind label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finite, ordered, non-empty list of valid selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<Selector>,
}

impl OptionSet {
    pub fn new<I, S>(labels: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options: Vec<Selector> = Vec::new();
        for raw in labels {
            let label = raw.as_ref().trim();
            if label.is_empty() {
                return Err(SelectionError::EmptyLabel);
            }
            if options.iter().any(|o| o.as_str() == label) {
                return Err(SelectionError::DuplicateOption(label.to_string()));
            }
            options.push(Selector(label.to_string()));
        }
        if options.is_empty() {
            return Err(SelectionError::EmptyOptions);
        }
        Ok(Self { options })
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Selector> {
        self.options.get(index)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| o.as_str() == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selector> {
        self.options.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Changed(Selector),
    Unchanged,
}

/// The single active selector, always a member of its option set.
#[derive(Debug, Clone)]
pub struct SelectionState {
    options: OptionSet,
    current: usize,
}

impl SelectionState {
    pub fn new(options: OptionSet, initial: Option<&str>) -> Result<Self, SelectionError> {
        let current = match initial.map(str::trim).filter(|s| !s.is_empty()) {
            Some(label) => options
                .position(label)
                .ok_or_else(|| SelectionError::UnknownOption(label.to_string()))?,
            None => 0,
        };
        Ok(Self { options, current })
    }

    pub fn current(&self) -> &Selector {
        &self.options.options[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Re-selecting the active value is reported as `Unchanged` so callers
    /// can skip the redundant fetch.
    pub fn select(&mut self, label: &str) -> Result<SelectOutcome, SelectionError> {
        let index = self
            .options
            .position(label)
            .ok_or_else(|| SelectionError::UnknownOption(label.to_string()))?;
        Ok(self.set_index(index))
    }

    pub fn select_index(&mut self, index: usize) -> Result<SelectOutcome, SelectionError> {
        let len = self.options.len();
        if index >= len {
            return Err(SelectionError::IndexOutOfRange { index, len });
        }
        Ok(self.set_index(index))
    }

    pub fn select_next(&mut self) -> SelectOutcome {
        let next = (self.current + 1) % self.options.len();
        self.set_index(next)
    }

    pub fn select_prev(&mut self) -> SelectOutcome {
        let len = self.options.len();
        let prev = (self.current + len - 1) % len;
        self.set_index(prev)
    }

    fn set_index(&mut self, index: usize) -> SelectOutcome {
        if index == self.current {
            return SelectOutcome::Unchanged;
        }
        self.current = index;
        SelectOutcome::Changed(self.current().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> SelectionState {
        let options = OptionSet::new(["Faker", "Caps", "Chovy"]).unwrap();
        SelectionState::new(options, None).unwrap()
    }

    #[test]
    fn option_set_rejects_blank_and_duplicate_labels() {
        assert_eq!(
            OptionSet::new(Vec::<String>::new()),
            Err(SelectionError::EmptyOptions)
        );
        assert_eq!(OptionSet::new(["Faker", "  "]), Err(SelectionError::EmptyLabel));
        assert_eq!(
            OptionSet::new(["Faker", " Faker"]),
            Err(SelectionError::DuplicateOption("Faker".to_string()))
        );
    }

    #[test]
    fn initial_defaults_to_first_option() {
        let sel = players();
        assert_eq!(sel.current().as_str(), "Faker");
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn unknown_initial_is_rejected() {
        let options = OptionSet::new(["Faker", "Caps"]).unwrap();
        assert!(matches!(
            SelectionState::new(options, Some("Ruler")),
            Err(SelectionError::UnknownOption(_))
        ));
    }

    #[test]
    fn reselecting_current_is_unchanged() {
        let mut sel = players();
        assert_eq!(sel.select("Faker").unwrap(), SelectOutcome::Unchanged);
    }

    #[test]
    fn unknown_select_leaves_current_alone() {
        let mut sel = players();
        assert!(sel.select("Ruler").is_err());
        assert_eq!(sel.current().as_str(), "Faker");
    }

    #[test]
    fn select_index_jumps_and_rejects_out_of_range() {
        let mut sel = players();
        assert!(matches!(sel.select_index(2), Ok(SelectOutcome::Changed(s)) if s.as_str() == "Chovy"));
        assert_eq!(sel.select_index(2), Ok(SelectOutcome::Unchanged));
        assert_eq!(
            sel.select_index(3),
            Err(SelectionError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(sel.current().as_str(), "Chovy");
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let mut sel = players();
        assert!(matches!(sel.select_prev(), SelectOutcome::Changed(s) if s.as_str() == "Chovy"));
        assert!(matches!(sel.select_next(), SelectOutcome::Changed(s) if s.as_str() == "Faker"));
    }

    #[test]
    fn single_option_never_changes() {
        let options = OptionSet::new(["Faker"]).unwrap();
        let mut sel = SelectionState::new(options, None).unwrap();
        assert_eq!(sel.select_next(), SelectOutcome::Unchanged);
        assert_eq!(sel.select_prev(), SelectOutcome::Unchanged);
    }
}
