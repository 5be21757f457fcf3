// Guest map storage
// Entries are keyed by the canonical encoding of the original key and keep insertion order

use crate::runtime::values::Term;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct TermMap {
    data: IndexMap<String, (Term, Term)>,
}

impl TermMap {
    pub fn new() -> Self {
        TermMap {
            data: IndexMap::new(),
        }
    }

    /// Builds a map from key/value pairs; a repeated key keeps its first position
    /// and takes the last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Term, Term)>,
    {
        let mut data = IndexMap::new();
        for (key, value) in pairs {
            data.insert(key.encode_map_key(), (key, value));
        }
        TermMap { data }
    }

    /// Returns a new map with `key` bound to `value`.
    pub fn put(&self, key: Term, value: Term) -> TermMap {
        let mut data = self.data.clone();
        data.insert(key.encode_map_key(), (key, value));
        TermMap { data }
    }

    /// Returns a new map without `key`. Remaining entries keep their order.
    pub fn remove(&self, key: &Term) -> TermMap {
        let mut data = self.data.clone();
        data.shift_remove(&key.encode_map_key());
        TermMap { data }
    }

    pub fn get(&self, key: &Term) -> Option<&Term> {
        self.get_encoded(&key.encode_map_key())
    }

    pub fn get_encoded(&self, encoded: &str) -> Option<&Term> {
        self.data.get(encoded).map(|(_, value)| value)
    }

    pub fn fetch(&self, key: &Term) -> Option<(&Term, &Term)> {
        self.data
            .get(&key.encode_map_key())
            .map(|(key, value)| (key, value))
    }

    pub fn has_key(&self, key: &Term) -> bool {
        self.data.contains_key(&key.encode_map_key())
    }

    pub fn keys(&self) -> Vec<Term> {
        self.data.values().map(|(key, _)| key.clone()).collect()
    }

    pub fn values(&self) -> Vec<Term> {
        self.data.values().map(|(_, value)| value.clone()).collect()
    }

    /// Entries as `{key, value}` tuples in insertion order.
    pub fn to_list(&self) -> Vec<Term> {
        self.data
            .values()
            .map(|(key, value)| Term::tuple(vec![key.clone(), value.clone()]))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &Term)> {
        self.data.values().map(|(key, value)| (key, value))
    }

    pub fn iter_encoded(&self) -> impl Iterator<Item = (&String, &Term, &Term)> {
        self.data
            .iter()
            .map(|(encoded, (key, value))| (encoded, key, value))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl PartialEq for TermMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.data.iter().all(|(encoded, (_, value))| {
                other.get_encoded(encoded).map_or(false, |v| v == value)
            })
    }
}

impl FromIterator<(Term, Term)> for TermMap {
    fn from_iter<T: IntoIterator<Item = (Term, Term)>>(iter: T) -> Self {
        TermMap::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TermMap {
        TermMap::from_pairs(vec![
            (Term::atom("a"), Term::integer(1)),
            (Term::string("b"), Term::integer(2)),
        ])
    }

    #[test]
    fn put_is_non_destructive() {
        let map = sample();
        let updated = map.put(Term::atom("c"), Term::integer(3));
        assert_eq!(map.len(), 2);
        assert_eq!(updated.len(), 3);
        assert_eq!(updated.get(&Term::atom("c")), Some(&Term::integer(3)));
    }

    #[test]
    fn put_overwrites_in_place() {
        let updated = sample().put(Term::atom("a"), Term::integer(10));
        assert_eq!(
            updated.keys(),
            vec![Term::atom("a"), Term::string("b")]
        );
        assert_eq!(updated.get(&Term::atom("a")), Some(&Term::integer(10)));
    }

    #[test]
    fn remove_keeps_order_of_remaining_entries() {
        let map = sample().put(Term::atom("c"), Term::integer(3));
        let removed = map.remove(&Term::string("b"));
        assert_eq!(removed.keys(), vec![Term::atom("a"), Term::atom("c")]);
        assert!(!removed.has_key(&Term::string("b")));
    }

    #[test]
    fn integer_and_float_keys_are_distinct() {
        let map = TermMap::from_pairs(vec![
            (Term::integer(1), Term::atom("int")),
            (Term::float(1.0), Term::atom("float")),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Term::integer(1)), Some(&Term::atom("int")));
    }

    #[test]
    fn to_list_yields_tuples_in_insertion_order() {
        assert_eq!(
            sample().to_list(),
            vec![
                Term::tuple(vec![Term::atom("a"), Term::integer(1)]),
                Term::tuple(vec![Term::string("b"), Term::integer(2)]),
            ]
        );
    }
}
