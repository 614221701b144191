use std::collections::HashSet;

/// Repository identity used for deduplication: `(owner, repo)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoKey {
    pub owner: String,
    pub repo: String,
}

impl RepoKey {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoKey {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

/// One file-level hit returned by the code search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub repo_url: String,
    pub search_url: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl SearchResult {
    pub fn key(&self) -> RepoKey {
        RepoKey::new(self.owner.as_str(), self.repo.as_str())
    }
}

/// Repositories accepted so far, in the order they were accepted.
#[derive(Debug, Clone, Default)]
pub struct AcceptedSet {
    order: Vec<RepoKey>,
    seen: HashSet<RepoKey>,
}

impl AcceptedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, key: RepoKey) -> bool {
        if self.seen.insert(key.clone()) {
            self.order.push(key);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, key: &RepoKey) -> bool {
        self.seen.contains(key)
    }

    /// Adds every pair of `other` not yet present, keeping `other`'s order.
    pub fn merge(&mut self, other: AcceptedSet) {
        for key in other.order {
            self.insert(key);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepoKey> {
        self.order.iter()
    }
}

impl FromIterator<RepoKey> for AcceptedSet {
    fn from_iter<T: IntoIterator<Item = RepoKey>>(iter: T) -> Self {
        let mut set = AcceptedSet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}
