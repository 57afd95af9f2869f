use std::collections::HashSet;

/// An ordered set of native atom indices.
///
/// Iteration order is the order in which members were first inserted; inserting an index that
/// is already present is a no-op. Region categories are built by unioning several selection
/// results into one `AtomSet`, so the first sub-selection that mentions an atom decides where
/// it appears in the output.
#[derive(Debug, Clone, Default)]
pub struct AtomSet {
    order: Vec<usize>,
    members: HashSet<usize>,
}

impl AtomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Inserts an index at the end of the iteration order.
    ///
    /// # Return
    ///
    /// Returns `true` if the index was not already a member.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.members.insert(index) {
            self.order.push(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Members in insertion order.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    /// Appends every member of `other` that is not yet present, keeping `other`'s order.
    pub fn union_with(&mut self, other: &AtomSet) {
        for index in other.iter() {
            self.insert(index);
        }
    }

    /// Ordered union: members of `self` first, then the new members of `other`.
    pub fn union(&self, other: &AtomSet) -> AtomSet {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    /// Members of `self` that are not in `other`, in `self`'s order.
    pub fn difference(&self, other: &AtomSet) -> AtomSet {
        self.iter().filter(|&index| !other.contains(index)).collect()
    }

    /// Members of `self` that are also in `other`, in `self`'s order.
    pub fn intersection(&self, other: &AtomSet) -> AtomSet {
        self.iter().filter(|&index| other.contains(index)).collect()
    }
}

impl PartialEq for AtomSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for AtomSet {}

impl FromIterator<usize> for AtomSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = AtomSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<usize> for AtomSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

impl<'a> IntoIterator for &'a AtomSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().copied()
    }
}
