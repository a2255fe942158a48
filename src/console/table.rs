use std::collections::BTreeSet;

use super::store::Record;

pub const EMPTY_MESSAGE: &str = "No records found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

/// Row ids checked in one table instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<i64>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    pub fn toggle(&mut self, id: i64) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    /// Header checkbox state: every listed row is checked.
    pub fn covers(&self, ids: impl IntoIterator<Item = i64>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.0.contains(&id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Unchecks the listed rows when all of them are checked, checks them
    /// all otherwise.
    pub fn toggle_all(&mut self, ids: impl IntoIterator<Item = i64>) {
        let ids: BTreeSet<i64> = ids.into_iter().collect();
        if !ids.is_empty() && ids.is_subset(&self.0) {
            self.0.retain(|id| !ids.contains(id));
        } else {
            self.0.extend(ids);
        }
    }

    pub fn retain(&mut self, keep: impl Fn(i64) -> bool) {
        self.0.retain(|id| keep(*id));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Edit(i64),
    SelectionChanged(BTreeSet<i64>),
}

/// One rendered page of a table.
#[derive(Debug)]
pub struct TablePage<'a, T> {
    pub rows: Vec<&'a T>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub sort: SortOrder,
    pub all_selected: bool,
    pub can_prev: bool,
    pub can_next: bool,
}

impl<T> TablePage<'_, T> {
    /// True when the table shows the single "no records" row.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.page_count)
    }
}

#[derive(Debug, Clone)]
pub struct TableView {
    page_size: usize,
    page: usize,
    sort: SortOrder,
}

impl TableView {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
            sort: SortOrder::default(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// The requested page clamped into `1..=page_count`.
    pub fn current_page(&self, total: usize) -> usize {
        self.page.min(self.page_count(total)).max(1)
    }

    pub fn next_page(&mut self, total: usize) {
        let current = self.current_page(total);
        if current < self.page_count(total) {
            self.page = current + 1;
        }
    }

    pub fn prev_page(&mut self, total: usize) {
        let current = self.current_page(total);
        if current > 1 {
            self.page = current - 1;
        }
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn render<'a, T, I>(&self, records: I, selection: &Selection) -> TablePage<'a, T>
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut sorted: Vec<&'a T> = records.into_iter().collect();
        match self.sort {
            SortOrder::Ascending => sorted.sort_by_key(|record| record.id()),
            SortOrder::Descending => sorted.sort_by(|a, b| b.id().cmp(&a.id())),
        }

        let total = sorted.len();
        let all_selected = selection.covers(sorted.iter().map(|record| record.id()));
        let page_count = self.page_count(total);
        let page = self.current_page(total);
        let start = self.page_size * (page - 1);
        let rows: Vec<&'a T> = sorted.into_iter().skip(start).take(self.page_size).collect();

        TablePage {
            rows,
            page,
            page_count,
            total,
            sort: self.sort,
            all_selected,
            can_prev: page > 1,
            can_next: page < page_count,
        }
    }

    pub fn toggle_row(&self, selection: &mut Selection, id: i64) -> TableEvent {
        selection.toggle(id);
        TableEvent::SelectionChanged(selection.ids().clone())
    }

    pub fn toggle_all<'a, T, I>(&self, selection: &mut Selection, records: I) -> TableEvent
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        selection.toggle_all(records.into_iter().map(Record::id));
        TableEvent::SelectionChanged(selection.ids().clone())
    }

    pub fn edit(&self, id: i64) -> TableEvent {
        TableEvent::Edit(id)
    }
}
