use rustc_hash::FxHashMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PlayerId(usize);

/// Interns player names as dense ids.
#[derive(Default)]
pub struct PlayerIds {
    inner: FxHashMap<Box<str>, PlayerId>,
    names: Vec<Box<str>>,
}

impl PlayerIds {
    pub fn get_or_insert(&mut self, name: String) -> PlayerId {
        if let Some(&id) = self.inner.get(name.as_str()) {
            return id;
        }
        let id = PlayerId(self.names.len());
        let name = name.into_boxed_str();
        self.names.push(name.clone());
        self.inner.insert(name, id);
        id
    }

    pub fn get(&self, name: &str) -> Option<PlayerId> {
        self.inner.get(name).copied()
    }

    pub fn name(&self, PlayerId(id): PlayerId) -> &str {
        &self.names[id]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Dense table of values by player id.
pub struct ByPlayerId<T> {
    inner: Vec<Option<T>>,
}

impl<T> Default for ByPlayerId<T> {
    fn default() -> Self {
        ByPlayerId { inner: Vec::new() }
    }
}

impl<T> ByPlayerId<T> {
    pub fn get(&self, PlayerId(id): PlayerId) -> Option<&T> {
        match self.inner.get(id) {
            Some(Some(t)) => Some(t),
            _ => None,
        }
    }

    pub fn set(&mut self, PlayerId(id): PlayerId, value: T) {
        if self.inner.len() <= id {
            self.inner.resize_with(id + 1, || None);
        }
        self.inner[id] = Some(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.inner
            .iter()
            .enumerate()
            .filter_map(|(id, value)| value.as_ref().map(|value| (PlayerId(id), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_ids() {
        let mut ids = PlayerIds::default();
        let alice = ids.get_or_insert("alice".to_owned());
        let bob = ids.get_or_insert("bob".to_owned());
        assert_ne!(alice, bob);
        assert_eq!(ids.get_or_insert("alice".to_owned()), alice);
        assert_eq!(ids.get("bob"), Some(bob));
        assert_eq!(ids.name(bob), "bob");
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_by_player_id() {
        let mut ids = PlayerIds::default();
        let alice = ids.get_or_insert("alice".to_owned());
        let bob = ids.get_or_insert("bob".to_owned());

        let mut table = ByPlayerId::default();
        table.set(bob, 2);
        assert_eq!(table.get(alice), None);
        assert_eq!(table.get(bob), Some(&2));
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(bob, &2)]);
    }
}
