use std::collections::{HashSet, VecDeque};

/// URLs that have already been posted, oldest first.
///
/// Once the history holds more than `cap` entries it is trimmed to the
/// `retain` most recent ones.
#[derive(Debug, Clone)]
pub struct PostedHistory {
    order: VecDeque<String>,
    index: HashSet<String>,
    cap: usize,
    retain: usize,
}

impl PostedHistory {
    #[must_use]
    pub fn new(cap: usize, retain: usize) -> Self {
        Self {
            order: VecDeque::new(),
            index: HashSet::new(),
            cap,
            retain: retain.min(cap),
        }
    }

    /// Rebuild from a persisted list (oldest first), dropping repeats and
    /// applying the cap.
    #[must_use]
    pub fn from_urls(urls: Vec<String>, cap: usize, retain: usize) -> Self {
        let mut history = Self::new(cap, retain);
        for url in urls {
            history.insert(url);
        }
        history
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    /// Record `url` as the most recent post. Returns `false` if it was
    /// already present.
    pub fn insert(&mut self, url: String) -> bool {
        if self.index.contains(&url) {
            return false;
        }
        self.index.insert(url.clone());
        self.order.push_back(url);
        if self.order.len() > self.cap {
            self.trim();
        }
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Oldest first, the order used for persistence.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    fn trim(&mut self) {
        let evict = self.order.len().saturating_sub(self.retain);
        for url in self.order.drain(..evict) {
            self.index.remove(&url);
        }
        tracing::debug!(evicted = evict, kept = self.order.len(), "trimmed posted history");
    }
}
