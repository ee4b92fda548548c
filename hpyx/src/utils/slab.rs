use std::mem::MaybeUninit;

/// Indexed storage with slot reuse.
///
/// Keys returned by [`insert`](Self::insert) stay valid until the matching
/// [`remove`](Self::remove); afterwards the slot may be handed out again,
/// so callers that keep keys around must pair them with their own
/// generation or id.
pub(crate) struct Slab<T> {
    items: Vec<MaybeUninit<T>>,
    /// Free slots, reused LIFO.
    free: Vec<usize>,
    /// `used[i]` is `true` iff `items[i]` is initialized.
    used: Vec<bool>,
    len: usize,
}

impl<T> Slab<T> {
    /// Creates a slab with `size` pre-allocated free slots.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            items: (0..size).map(|_| MaybeUninit::uninit()).collect(),
            free: (0..size).rev().collect(),
            used: vec![false; size],
            len: 0,
        }
    }

    /// Stores `item` and returns its key. Doubles the capacity when full.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                let len = self.items.len();
                let new_len = (len * 2).max(1);

                self.items
                    .extend((len..new_len).map(|_| MaybeUninit::uninit()));
                self.used.resize(new_len, false);
                self.free.extend(((len + 1)..new_len).rev());

                len
            }
        };

        self.items[index] = MaybeUninit::new(item);
        self.used[index] = true;
        self.len += 1;

        index
    }

    /// Removes and returns the value at `index`, or `None` if the slot is
    /// free or out of range.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        if !self.contains(index) {
            return None;
        }

        self.used[index] = false;
        self.free.push(index);
        self.len -= 1;

        // Safety: `used[index]` was true, so the slot is initialized; it is
        // marked free above and never read again before being rewritten.
        Some(unsafe { self.items[index].assume_init_read() })
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.contains(index) {
            return None;
        }

        // Safety: checked initialized above.
        Some(unsafe { self.items[index].assume_init_mut() })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Iterates over occupied slots as `(key, value)`.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .zip(self.used.iter())
            .enumerate()
            .filter(|(_, (_, used))| **used)
            // Safety: filtered on `used`.
            .map(|(i, (slot, _))| (i, unsafe { slot.assume_init_ref() }))
    }
}

impl<T> Drop for Slab<T> {
    fn drop(&mut self) {
        for (slot, &used) in self.items.iter_mut().zip(self.used.iter()) {
            if used {
                // Safety: `used` marks initialized slots.
                unsafe {
                    slot.assume_init_drop();
                }
            }
        }
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_freed_slots() {
        let mut slab = Slab::new(1);
        let a = slab.insert("a");
        let b = slab.insert("b");
        assert_eq!(slab.len(), 2);

        assert_eq!(slab.remove(a), Some("a"));
        assert_eq!(slab.remove(a), None);

        let c = slab.insert("c");
        assert_eq!(c, a);
        assert_eq!(slab.get_mut(b), Some(&mut "b"));
        assert_eq!(slab.get_mut(c), Some(&mut "c"));
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut slab = Slab::new(4);
        let keys: Vec<_> = (0..4).map(|i| slab.insert(i)).collect();
        slab.remove(keys[1]);

        let values: Vec<_> = slab.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 2, 3]);
    }

    #[test]
    fn drops_remaining_items() {
        use std::rc::Rc;

        let marker = Rc::new(());
        {
            let mut slab = Slab::new(0);
            slab.insert(marker.clone());
            slab.insert(marker.clone());
            assert_eq!(Rc::strong_count(&marker), 3);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
