use crate::entity::EntityId;
use foundation::handles::Handle;

/// Per-marker hover flags backed by a bitset.
///
/// Membership is tracked by `EntityId::index()`; iteration yields entities
/// in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverSet {
    words: Vec<u64>,
}

impl HoverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        let (word, bit) = word_bit(entity.index());
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Sets or clears the flag for `entity`. Returns `true` if it changed.
    pub fn set(&mut self, entity: EntityId, hovered: bool) -> bool {
        if hovered {
            self.insert(entity)
        } else {
            self.remove(entity)
        }
    }

    pub fn insert(&mut self, entity: EntityId) -> bool {
        let (word, bit) = word_bit(entity.index());
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        true
    }

    pub fn remove(&mut self, entity: EntityId) -> bool {
        let (word, bit) = word_bit(entity.index());
        let Some(w) = self.words.get_mut(word) else {
            return false;
        };
        let mask = 1u64 << bit;
        if (*w & mask) == 0 {
            return false;
        }
        *w &= !mask;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.words.iter().enumerate().flat_map(|(word_index, &word)| {
            let base = (word_index as u32) * 64;
            (0..64u32)
                .filter(move |&bit| word & (1u64 << bit) != 0)
                .map(move |bit| EntityId(Handle::new(base + bit)))
        })
    }
}

fn word_bit(index: u32) -> (usize, u32) {
    ((index / 64) as usize, index % 64)
}

#[cfg(test)]
mod tests {
    use super::HoverSet;
    use crate::entity::EntityId;
    use foundation::handles::Handle;

    fn e(idx: u32) -> EntityId {
        EntityId(Handle::new(idx))
    }

    #[test]
    fn set_reports_changes() {
        let mut s = HoverSet::new();
        assert_eq!(s.iter().count(), 0);
        assert!(s.set(e(3), true));
        assert!(!s.set(e(3), true));
        assert!(s.contains(e(3)));
        assert_eq!(s.iter().count(), 1);
        assert!(s.set(e(3), false));
        assert!(!s.set(e(3), false));
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn flags_are_independent() {
        let mut s = HoverSet::new();
        s.insert(e(1));
        s.insert(e(70));
        assert!(!s.contains(e(2)));
        s.remove(e(1));
        assert!(s.contains(e(70)));
    }

    #[test]
    fn iter_is_sorted() {
        let mut s = HoverSet::new();
        s.insert(e(65));
        s.insert(e(2));
        s.insert(e(10));
        let got: Vec<u32> = s.iter().map(|e| e.index()).collect();
        assert_eq!(got, vec![2, 10, 65]);
    }
}
