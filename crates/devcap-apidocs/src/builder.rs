//! Response assembly with response-unique ids.
//!
//! Ids let a client send a later navigation request for an entry it saw in
//! a response. The builder derives every id from the entry's full dotted
//! name. When the same full name appears again in one response (a module
//! requested twice, an overload documented twice), the repeat gets the
//! first free `#2`, `#3`, ... suffix in tree order, so ids stay unique and
//! the same input always yields the same ids.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::protocol::{ApiDocsEntry, ApiDocsParams, ApiDocsResponse};

/// Collects documentation trees into one response.
#[derive(Debug, Default)]
pub struct ApiDocsResponseBuilder {
    response: ApiDocsResponse,
    /// Last suffix tried per full name
    seen: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl ApiDocsResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tree under `key`, assigning ids to it and its descendants.
    ///
    /// A key that was already inserted is replaced.
    pub fn insert(&mut self, key: impl Into<String>, mut root: ApiDocsEntry) -> &mut Self {
        let key = key.into();
        self.assign_ids(&mut root);
        if self.response.insert(key.clone(), root).is_some() {
            warn!(%key, "api docs entry replaced");
        }
        self
    }

    fn assign_ids(&mut self, entry: &mut ApiDocsEntry) {
        let mut id = entry.full_name.clone();
        let suffix = self.seen.entry(entry.full_name.clone()).or_insert(1);
        while self.issued.contains(&id) {
            *suffix += 1;
            id = format!("{}#{}", entry.full_name, suffix);
        }
        self.issued.insert(id.clone());
        entry.id = id;

        if let Some(children) = entry.children.as_mut() {
            for child in children {
                self.assign_ids(child);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }

    /// Requested modules that have no tree yet.
    pub fn missing_modules<'p>(&self, params: &'p ApiDocsParams) -> Vec<&'p str> {
        params
            .modules
            .iter()
            .map(String::as_str)
            .filter(|module| !self.response.contains_key(*module))
            .collect()
    }

    pub fn finish(self) -> ApiDocsResponse {
        debug!(entries = self.response.len(), "api docs response built");
        self.response
    }
}

/// Find the entry with `id` anywhere in a response.
pub fn find_entry<'a>(response: &'a ApiDocsResponse, id: &str) -> Option<&'a ApiDocsEntry> {
    response
        .values()
        .flat_map(|entry| entry.walk())
        .find(|entry| entry.id == id)
}
