use super::ItemId;

/// Insertion ordered items keyed by monotonically increasing ids.
///
/// Ids only grow and removal keeps the order, so the entries stay sorted by id and lookups
/// are binary searches.
#[derive(Debug, Clone)]
pub struct ItemStore<E> {
    next_id: u64,
    entries: Vec<(ItemId, E)>,
}

impl<E> Default for ItemStore<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> ItemStore<E> {
    pub fn push(&mut self, entry: E) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, entry));
        id
    }

    fn find(&self, id: ItemId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(i, _)| *i)
    }

    pub fn get(&self, id: ItemId) -> Option<&E> {
        self.find(id).ok().map(|ind| &self.entries[ind].1)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<E> {
        self.find(id).ok().map(|ind| self.entries.remove(ind).1)
    }

    /// Ids are not reset, handles from before the clear stay dead.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &E)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
