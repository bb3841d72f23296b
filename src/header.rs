//! An ordered, case-insensitive multimap of header name to header value.
//!
//! Unlike `http::HeaderMap`, which keeps repeated headers as distinct
//! entries, this table *folds* a repeated header into a single entry whose
//! value is the comma-joined concatenation (RFC 7230 §3.2.2), mirroring the
//! original prototype's `http_add_header`/`http_parse_header` behavior.

use std::fmt;

/// A single `name: value` header entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    /// The header's name, in whatever casing it was first set or parsed with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header's value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An ordered, case-insensitive collection of [`Header`]s.
///
/// At most one entry exists per case-folded name after any call to
/// [`HeaderTable::set`]. [`HeaderTable::append`] folds repeated values into
/// the existing entry, separated by `", "`, which is legal per RFC 7230
/// §3.2.2 for headers like `Connection: keep-alive, upgrade`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    entries: Vec<Header>,
}

impl HeaderTable {
    /// Creates an empty table.
    pub fn new() -> HeaderTable {
        HeaderTable {
            entries: Vec::new(),
        }
    }

    /// Overwrites any existing same-named entry with `value`, or appends a
    /// new entry if none exists. This is pure replacement: a prior value is
    /// never concatenated with the new one.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(i) => self.entries[i].value = value,
            None => self.entries.push(Header {
                name: name.to_owned(),
                value,
            }),
        }
    }

    /// Folds `value` into the existing same-named entry (joined by `", "`),
    /// or inserts a new entry if none exists yet.
    pub fn append(&mut self, name: &str, value: impl AsRef<str>) {
        let value = value.as_ref();
        match self.position(name) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.value.reserve(2 + value.len());
                entry.value.push_str(", ");
                entry.value.push_str(value);
            }
            None => self.entries.push(Header {
                name: name.to_owned(),
                value: value.to_owned(),
            }),
        }
    }

    /// Returns the value of the first case-insensitive match, if any.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.entries[i].value.as_str())
    }

    /// Returns true if a header with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    /// The number of distinct header entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases all stored headers.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|h| h.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Debug for HeaderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|h| (&h.name, &h.value)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_case_insensitively() {
        let mut t = HeaderTable::new();
        t.set("Content-Length", "5");
        t.set("content-length", "10");
        assert_eq!(t.len(), 1);
        assert_eq!(t.find("CONTENT-LENGTH"), Some("10"));
    }

    #[test]
    fn append_folds_with_comma_space() {
        let mut t = HeaderTable::new();
        t.append("Connection", "keep-alive");
        t.append("connection", "upgrade");
        assert_eq!(t.len(), 1);
        assert_eq!(t.find("Connection"), Some("keep-alive, upgrade"));
    }

    #[test]
    fn append_creates_when_absent() {
        let mut t = HeaderTable::new();
        t.append("Host", "example.com");
        assert_eq!(t.find("host"), Some("example.com"));
    }

    #[test]
    fn find_is_case_insensitive_for_any_permutation() {
        let mut t = HeaderTable::new();
        t.set("X-Custom", "v");
        for name in ["x-custom", "X-CUSTOM", "X-cUsToM"] {
            assert_eq!(t.find(name), Some("v"));
        }
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut t = HeaderTable::new();
        t.set("Host", "a");
        t.set("Accept", "b");
        t.set("User-Agent", "c");
        let names: Vec<_> = t.iter().map(Header::name).collect();
        assert_eq!(names, vec!["Host", "Accept", "User-Agent"]);
    }

    #[test]
    fn clear_releases_all() {
        let mut t = HeaderTable::new();
        t.set("Host", "a");
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.find("Host"), None);
    }

    #[test]
    fn set_preserves_first_seen_name_casing() {
        let mut t = HeaderTable::new();
        t.set("X-Foo", "1");
        t.set("x-foo", "2");
        assert_eq!(t.iter().next().unwrap().name(), "X-Foo");
    }
}
