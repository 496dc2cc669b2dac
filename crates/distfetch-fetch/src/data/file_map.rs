use std::collections::HashMap;

use super::DistfileName;

/// Map keyed by distfile that keeps first-insertion order.
#[derive(Debug, Clone)]
pub struct FileMap<V> {
    entries: Vec<(DistfileName, V)>,
    index:   HashMap<String, usize>,
}

impl<V> Default for FileMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index:   HashMap::new(),
        }
    }
}

impl<V> FileMap<V> {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        let i = *self.index.get(name)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

    /// Existing value for `file`, or `default()` inserted at the end.
    pub fn entry_or_insert_with(&mut self, file: &DistfileName, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(file.as_str()) {
            Some(&i) => i,
            None => {
                self.entries.push((file.clone(), default()));
                self.index.insert(file.as_str().to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DistfileName, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        let i = self.index.remove(name)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<V> IntoIterator for FileMap<V> {
    type Item = (DistfileName, V);
    type IntoIter = std::vec::IntoIter<(DistfileName, V)>;

    fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_insertion_order() {
        let mut map = FileMap::new();
        map.entry_or_insert_with(&"b".into(), Vec::new).push(1);
        map.entry_or_insert_with(&"a".into(), Vec::new).push(2);
        map.entry_or_insert_with(&"b".into(), Vec::new).push(3);

        let keys: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(map.get("b"), Some(&vec![1, 3]));
    }

    #[test]
    fn test_remove_reindexes() {
        let mut map = FileMap::new();
        for name in ["a", "b", "c"] {
            map.entry_or_insert_with(&name.into(), || name.to_uppercase());
        }
        assert_eq!(map.remove("a"), Some("A".to_string()));
        assert_eq!(map.get("c").map(String::as_str), Some("C"));
        assert_eq!(map.len(), 2);
        assert!(!map.contains("a"));
    }
}
