//! `MachineSet`: compact bit-set over machine slots.
//!
//! A species' machine compatibility is a set of slot indices into the data
//! set's machine table for that era. On the wire it is a sorted list of slot
//! indices; in memory it is a word vector.

use serde::{Deserialize, Serialize};

/// Set of machine slots a species is compatible with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u16>", into = "Vec<u16>")]
pub struct MachineSet {
    words: Vec<u64>,
}

impl MachineSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot.
    pub fn insert(&mut self, slot: u16) {
        let (word, bit) = split(slot);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << bit;
    }

    /// Whether the slot is in the set.
    #[must_use]
    pub fn contains(&self, slot: u16) -> bool {
        let (word, bit) = split(slot);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &bits)| {
            (0..64u16).filter_map(move |b| {
                if bits & (1 << b) == 0 {
                    return None;
                }
                u16::try_from(w * 64).ok().map(|base| base + b)
            })
        })
    }

    /// Number of slots in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Highest slot in the set, if any.
    #[must_use]
    pub fn max_slot(&self) -> Option<u16> {
        self.iter().last()
    }
}

fn split(slot: u16) -> (usize, u32) {
    (usize::from(slot / 64), u32::from(slot % 64))
}

impl From<Vec<u16>> for MachineSet {
    fn from(slots: Vec<u16>) -> Self {
        slots.into_iter().collect()
    }
}

impl From<MachineSet> for Vec<u16> {
    fn from(set: MachineSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<u16> for MachineSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut set = Self::new();
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}
