//! Ordered, case-insensitive header storage.

/// A multimap of HTTP header fields.
///
/// Field names are stored lower-cased and looked up case-insensitively.
/// Insertion order is preserved, and a repeated field keeps every value in
/// arrival order; the header scanner relies on that to detect disagreeing
/// `Content-Length` repetitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `name`, creating the field on first use.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((name, vec![value.into()])),
        }
    }

    /// Get the first value stored under `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Get every value stored under `name`, in arrival order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check whether a field named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.values(name).is_some()
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map holds no fields at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    fn values(&self, name: &str) -> Option<&Vec<String>> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}
