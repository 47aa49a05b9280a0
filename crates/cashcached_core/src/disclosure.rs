//! Collapsible question/answer list
//!
//! Every item carries its own expanded flag. Toggling one item never touches
//! another, so any number of items may be open at once.

use thiserror::Error;

/// One question/answer pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisclosureItem {
    key: String,
    question: String,
    answer: String,
    expanded: bool,
}

impl DisclosureItem {
    /// Create a collapsed item
    pub fn new(
        key: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            answer: answer.into(),
            expanded: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Indicator shown next to the question
    pub fn chevron(&self) -> Chevron {
        if self.expanded {
            Chevron::Up
        } else {
            Chevron::Down
        }
    }
}

/// Direction of the disclosure indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chevron {
    Down,
    Up,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisclosureError {
    #[error("no disclosure item with key `{0}`")]
    UnknownKey(String),
}

/// Fixed, ordered list of disclosure items
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisclosureList {
    items: Vec<DisclosureItem>,
}

impl DisclosureList {
    /// Build the list; every item starts collapsed
    pub fn new(items: impl IntoIterator<Item = DisclosureItem>) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                item.expanded = false;
                item
            })
            .collect();
        Self { items }
    }

    /// Build from (question, answer) pairs, keyed `item-<index>`
    pub fn from_pairs<Q, A>(pairs: impl IntoIterator<Item = (Q, A)>) -> Self
    where
        Q: Into<String>,
        A: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .enumerate()
                .map(|(index, (q, a))| DisclosureItem::new(format!("item-{index}"), q, a)),
        )
    }

    /// Flip the expanded flag of the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. The index space is fixed at
    /// construction, so this is a caller bug.
    #[track_caller]
    pub fn toggle(&mut self, index: usize) {
        let len = self.items.len();
        let Some(item) = self.items.get_mut(index) else {
            panic!("disclosure index {index} out of range (len {len})");
        };
        item.expanded = !item.expanded;
    }

    /// Flip the expanded flag of the item with `key`
    pub fn toggle_key(&mut self, key: &str) -> Result<(), DisclosureError> {
        let index = self
            .position(key)
            .ok_or_else(|| DisclosureError::UnknownKey(key.to_string()))?;
        self.toggle(index);
        Ok(())
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.key == key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DisclosureItem> {
        self.items.get(index)
    }

    /// `false` for an out-of-range index
    pub fn is_expanded(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(DisclosureItem::is_expanded)
    }

    pub fn expanded_count(&self) -> usize {
        self.items.iter().filter(|item| item.expanded).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisclosureItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq() -> DisclosureList {
        DisclosureList::from_pairs([
            ("How long does setup take?", "One to two weeks."),
            ("Is it secure?", "Yes."),
            ("Do you support currencies?", "Many."),
        ])
    }

    fn flags(list: &DisclosureList) -> Vec<bool> {
        list.iter().map(DisclosureItem::is_expanded).collect()
    }

    #[test]
    fn test_starts_collapsed() {
        let list = faq();
        assert_eq!(flags(&list), vec![false, false, false]);
        assert_eq!(list.expanded_count(), 0);
    }

    #[test]
    fn test_new_resets_expanded_flags() {
        let mut open = DisclosureItem::new("a", "q", "a");
        open.expanded = true;
        let list = DisclosureList::new([open]);
        assert!(!list.is_expanded(0));
    }

    #[test]
    fn test_toggle_touches_only_the_addressed_item() {
        for index in 0..3 {
            let mut list = faq();
            list.toggle(1);
            let before = flags(&list);

            list.toggle(index);
            let after = flags(&list);

            for (i, (b, a)) in before.iter().zip(&after).enumerate() {
                if i == index {
                    assert_ne!(b, a);
                } else {
                    assert_eq!(b, a);
                }
            }
        }
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let mut list = faq();
        list.toggle(2);
        list.toggle(2);
        assert_eq!(flags(&list), vec![false, false, false]);
    }

    #[test]
    fn test_multiple_items_open() {
        let mut list = faq();
        list.toggle(0);
        list.toggle(2);
        assert_eq!(list.expanded_count(), 2);
        assert_eq!(list.get(0).map(DisclosureItem::chevron), Some(Chevron::Up));
        assert_eq!(list.get(1).map(DisclosureItem::chevron), Some(Chevron::Down));
    }

    #[test]
    fn test_toggle_key() {
        let mut list = faq();
        list.toggle_key("item-1").unwrap();
        assert!(list.is_expanded(1));

        assert_eq!(
            list.toggle_key("missing"),
            Err(DisclosureError::UnknownKey("missing".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_toggle_out_of_range_panics() {
        faq().toggle(3);
    }
}
