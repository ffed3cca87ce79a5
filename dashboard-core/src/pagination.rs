use std::{ops::Range, str::FromStr};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown page direction '{0}'. Use 'next' or 'prev'.")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "next" => Ok(Direction::Next),
            "prev" | "previous" => Ok(Direction::Prev),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Position within a fixed number of items split into equal pages.
///
/// `current_page` is 1-based and always within `1..=total_pages()`;
/// navigation past either end leaves the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    items_per_page: usize,
    total_items: usize,
}

impl PageState {
    /// Start on page 1. An `items_per_page` of zero is treated as one.
    pub fn new(items_per_page: usize, total_items: usize) -> Self {
        Self { current_page: 1, items_per_page: items_per_page.max(1), total_items }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// At least one page, even with nothing to show.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn page(self, direction: Direction) -> Self {
        match direction {
            Direction::Next if self.has_next() => Self { current_page: self.current_page + 1, ..self },
            Direction::Prev if self.has_prev() => Self { current_page: self.current_page - 1, ..self },
            _ => self,
        }
    }

    /// Jump to `page`, clamped into range.
    pub fn goto(self, page: usize) -> Self {
        Self { current_page: page.clamp(1, self.total_pages()), ..self }
    }

    pub fn reset(self) -> Self {
        Self { current_page: 1, ..self }
    }

    /// Item indices shown on the current page.
    pub fn visible_range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.items_per_page).min(self.total_items);
        let end = (self.current_page * self.items_per_page).min(self.total_items);
        start..end
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages())
    }
}
