use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fetched page and the outbound links extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub links: Vec<String>,
}

impl PageRecord {
    pub fn new(url: String, links: Vec<String>) -> Self {
        Self { url, links }
    }
}

/// Aggregated URL to outbound links map of a run.
///
/// Keys are kept sorted so that serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteMap {
    pages: BTreeMap<String, Vec<String>>,
}

impl SiteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page. The first record for a URL wins; returns false if the
    /// URL was already present.
    pub fn insert(&mut self, record: PageRecord) -> bool {
        if self.pages.contains_key(&record.url) {
            return false;
        }
        self.pages.insert(record.url, record.links);
        true
    }

    pub fn links(&self, url: &str) -> Option<&[String]> {
        self.pages.get(url).map(Vec::as_slice)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.pages.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.pages
    }
}

impl FromIterator<PageRecord> for SiteMap {
    fn from_iter<I: IntoIterator<Item = PageRecord>>(iter: I) -> Self {
        let mut site_map = SiteMap::new();
        for record in iter {
            site_map.insert(record);
        }
        site_map
    }
}
