use explorer_protocol::{Node, SearchResult};

/// Anything a list row can be selected by.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for Node {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for SearchResult {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Page cursor over a list.
///
/// The page starts on the one containing the selected item (page 0 if
/// there is none) and follows the selection when it changes. Explicit page
/// changes are clamped into range.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: usize,
    page: usize,
    selected: Option<String>,
}

impl<T: Keyed> Paginator<T> {
    /// A page size of 0 is treated as 1.
    pub fn new(items: Vec<T>, page_size: usize, selected: Option<&str>) -> Self {
        let mut paginator = Self {
            items,
            page_size: page_size.max(1),
            page: 0,
            selected: None,
        };
        paginator.select(selected);
        paginator
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Items on the current page.
    pub fn page_items(&self) -> &[T] {
        let start = (self.page * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Select an item and jump to its page. Unknown keys keep the page.
    pub fn select(&mut self, selected: Option<&str>) {
        self.selected = selected.map(str::to_string);
        let index = selected.and_then(|key| self.items.iter().position(|item| item.key() == key));
        if let Some(index) = index {
            self.page = index / self.page_size;
        }
    }

    /// Move to `page`, clamped to `[0, total_pages - 1]`.
    pub fn set_page(&mut self, page: i64) {
        let last = self.total_pages().saturating_sub(1) as i64;
        self.page = page.clamp(0, last) as usize;
    }

    /// Replace the list, keeping the selection in view when possible.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        let selected = self.selected.clone();
        self.select(selected.as_deref());
        self.set_page(self.page as i64);
    }
}
