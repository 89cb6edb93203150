//! Accumulated include directives.
//!
//! Headers are stored with their delimiters (`<vector>`, `"task.hpp"`) so
//! the flush is a plain lexicographic walk. Quoted project headers sort
//! ahead of angle-bracket system headers, which matches the emitted
//! layout the translator has always produced.

use std::collections::BTreeSet;

pub(crate) const REQUESTS_HEADER: &str = "\"requests.hpp\"";
pub(crate) const JSON_HEADER: &str = "\"nlohmann/json.hpp\"";

#[derive(Debug, Default, Clone)]
pub(crate) struct HeaderSet {
    headers: BTreeSet<String>,
}

impl HeaderSet {
    pub(crate) fn add(&mut self, header: &str) {
        self.headers.insert(header.to_string());
    }

    pub(crate) fn add_all(&mut self, headers: &[&str]) {
        for h in headers {
            self.add(h);
        }
    }

    pub(crate) fn contains(&self, header: &str) -> bool {
        self.headers.contains(header)
    }

    pub(crate) fn len(&self) -> usize {
        self.headers.len()
    }

    /// Render the sorted include block. The HTTP client header bundles the
    /// JSON library, so the JSON include is dropped when both are present.
    pub(crate) fn flush(mut self) -> Vec<String> {
        if self.headers.contains(REQUESTS_HEADER) {
            self.headers.remove(JSON_HEADER);
        }
        self.headers
            .into_iter()
            .map(|h| format!("#include {h}"))
            .collect()
    }
}
