//! Date-ordered entry storage shared by page workers.

use crate::dom::Document;
use parking_lot::Mutex;

/// One feed entry: a page and the date it was published.
#[derive(Debug, Clone)]
pub struct Entry {
    /// `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`, compared lexically.
    pub date: String,
    /// Output-relative page path, e.g. `posts/hello.html`.
    pub path: String,
    /// The fully merged page.
    pub content: Document,
}

/// Thread-safe entry list, kept sorted by date (newest first).
///
/// Every operation holds the lock for its whole duration, so a render
/// observes the list either before or after any insertion.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Mutex<Vec<Entry>>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page, keeping date-descending order.
    ///
    /// The new entry lands before every strictly older entry and after
    /// every entry with an equal or newer date. Nothing changes if the
    /// same path already sits at that position or among the entries with
    /// an identical date right before it.
    ///
    /// No other positions are checked: the same path inserted twice with
    /// different dates is kept twice. Callers insert each page once.
    pub fn insert(&self, date: String, path: String, content: Document) {
        let mut entries = self.entries.lock();

        // Entries are descending, so "older than `date`" is a suffix
        let index = entries.partition_point(|e| e.date.as_str() >= date.as_str());

        let same_date = entries[..index]
            .iter()
            .rev()
            .take_while(|e| e.date == date);
        if entries
            .get(index)
            .into_iter()
            .chain(same_date)
            .any(|e| e.path == path)
        {
            return;
        }
        entries.insert(
            index,
            Entry {
                date,
                path,
                content,
            },
        );
    }

    /// Run `f` over the entries while holding the lock.
    pub fn with_entries<R>(&self, f: impl FnOnce(&[Entry]) -> R) -> R {
        f(&self.entries.lock())
    }

    /// Entry paths in stored order.
    #[cfg(test)]
    pub fn paths(&self) -> Vec<String> {
        self.with_entries(|entries| entries.iter().map(|e| e.path.clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
