use std::collections::{HashSet, VecDeque};

/// A URL waiting to be crawled and the page it was discovered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub source_url: String,
}

/// What the scheduler may do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The entry has been marked visited and must be dispatched.
    Dispatch(FrontierEntry),
    /// The page cap has been reached; nothing more will be admitted.
    CapReached,
    /// No pending entry is left.
    Empty,
}

/// Pending queue plus visited set. Owned by the scheduler alone.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    max_pages: Option<usize>,
}

impl Frontier {
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            pending: VecDeque::new(),
            visited: HashSet::new(),
            max_pages: max_pages.filter(|&cap| cap > 0),
        }
    }

    /// Queue a discovered URL unless it has already been admitted.
    pub fn enqueue(&mut self, url: impl Into<String>, source_url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) {
            return false;
        }
        self.pending.push_back(FrontierEntry {
            url,
            source_url: source_url.into(),
        });
        true
    }

    /// Pop entries until one can be dispatched.
    ///
    /// Admission is the only place URLs enter the visited set.
    pub fn next_admission(&mut self) -> Admission {
        while let Some(entry) = self.pending.pop_front() {
            if self.visited.contains(&entry.url) {
                continue;
            }
            if self.cap_reached() {
                return Admission::CapReached;
            }
            self.visited.insert(entry.url.clone());
            return Admission::Dispatch(entry);
        }
        Admission::Empty
    }

    pub fn cap_reached(&self) -> bool {
        self.max_pages
            .is_some_and(|cap| self.visited.len() >= cap)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
