// Client-side search and pagination for task and client tables.
use crate::models::{Client, Task};

/// Search term and current page of a list. Changing the term always goes back
/// to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    term: String,
    page: usize,
}

impl Default for ListState {
    fn default() -> Self {
        Self { term: String::new(), page: 1 }
    }
}

impl ListState {
    pub fn new(term: &str, page: usize) -> Self {
        Self { term: term.to_string(), page: page.max(1) }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_term(&mut self, term: &str) {
        if self.term != term {
            self.term = term.to_string();
            self.page = 1;
        }
    }

    pub fn next(&mut self, total_pages: usize) {
        self.page = self.page.saturating_add(1).min(total_pages.max(1));
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

/// One page of an already filtered list.
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slices out `page` (1-based, clamped to the valid range).
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let number = page.clamp(1, total_pages.max(1));
    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages,
        total_items: items.len(),
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive substring match on client, category, task and employee names.
pub fn search_tasks<'a>(tasks: &[&'a Task], term: &str) -> Vec<&'a Task> {
    let needle = term.trim().to_lowercase();
    tasks
        .iter()
        .copied()
        .filter(|t| {
            needle.is_empty()
                || contains_folded(&t.client_name, &needle)
                || contains_folded(&t.task_category, &needle)
                || contains_folded(&t.task_name, &needle)
                || contains_folded(&t.employee_name, &needle)
        })
        .collect()
}

pub fn search_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let needle = term.trim().to_lowercase();
    clients
        .iter()
        .filter(|c| needle.is_empty() || contains_folded(&c.name, &needle) || contains_folded(&c.code, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_task, ApprovalStatus, TaskStatus};

    #[test]
    fn pages_of_ten_over_twenty_five_items() {
        let items: Vec<u32> = (1..=25).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, (1..=10).collect::<Vec<u32>>().as_slice());
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, [21, 22, 23, 24, 25]);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&items, 9, 10).number, 3);
        assert_eq!(paginate(&items, 0, 10).number, 1);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 4, 10);
        assert_eq!((page.number, page.total_pages, page.items.len()), (1, 0, 0));
        assert!(!page.has_next() && !page.has_previous());
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut state = ListState::default();
        state.previous();
        assert_eq!(state.page(), 1);
        state.next(3);
        state.next(3);
        state.next(3);
        assert_eq!(state.page(), 3);

        let mut state = ListState::new("", usize::MAX);
        state.next(usize::MAX);
        assert_eq!(state.page(), usize::MAX);
    }

    #[test]
    fn new_search_term_resets_to_first_page() {
        let mut state = ListState::new("", 3);
        state.set_term("gst");
        assert_eq!((state.term(), state.page()), ("gst", 1));

        state.next(5);
        state.set_term("gst");
        assert_eq!(state.page(), 2, "same term keeps the page");
    }

    #[test]
    fn task_search_matches_displayed_fields() {
        let mut a = sample_task(1, TaskStatus::Pending, ApprovalStatus::Pending);
        a.employee_name = "Priya Sharma".into();
        let mut b = sample_task(2, TaskStatus::Pending, ApprovalStatus::Pending);
        b.task_category = "TDS Return".into();
        b.client_name = "Zenith".into();
        let tasks = vec![&a, &b];

        assert_eq!(search_tasks(&tasks, "PRIYA").len(), 1);
        assert_eq!(search_tasks(&tasks, "tds")[0].id, 2);
        assert_eq!(search_tasks(&tasks, "zen")[0].id, 2);
        assert_eq!(search_tasks(&tasks, "").len(), 2);
        assert!(search_tasks(&tasks, "payroll").is_empty());
    }

    #[test]
    fn client_search_matches_name_or_code() {
        let clients = vec![
            Client { id: 1, name: "Acme Traders".into(), code: "ACME01".into() },
            Client { id: 2, name: "Blue Ocean".into(), code: "27BLUE".into() },
        ];
        assert_eq!(search_clients(&clients, "acme")[0].id, 1);
        assert_eq!(search_clients(&clients, "27b")[0].id, 2);
    }
}
