//! The ability lattice.
//!
//! Every Mova type carries a set of abilities that gate which operations are
//! legal on its values: `copy` (duplicable), `drop` (discardable), `store`
//! (embeddable in global storage), and `key` (usable as a top-level storage
//! entry). Unification consults these sets: an inference variable may only be
//! collapsed into a type that provides every ability the variable is bound to.

use std::fmt;

/// A single capability flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Copy,
    Drop,
    Store,
    Key,
}

impl Ability {
    pub const ALL: [Ability; 4] = [Ability::Copy, Ability::Drop, Ability::Store, Ability::Key];

    fn bit(self) -> u8 {
        match self {
            Ability::Copy => 0b0001,
            Ability::Drop => 0b0010,
            Ability::Store => 0b0100,
            Ability::Key => 0b1000,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ability::Copy => write!(f, "copy"),
            Ability::Drop => write!(f, "drop"),
            Ability::Store => write!(f, "store"),
            Ability::Key => write!(f, "key"),
        }
    }
}

/// A set of [`Ability`] flags, packed into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AbilitySet(u8);

impl AbilitySet {
    pub const EMPTY: AbilitySet = AbilitySet(0);
    pub const ALL: AbilitySet = AbilitySet(0b1111);
    /// The set shared by every primitive value type: `copy + drop + store`.
    pub const PRIMITIVES: AbilitySet = AbilitySet(0b0111);
    /// References can be duplicated and discarded but never stored.
    pub const REFERENCES: AbilitySet = AbilitySet(0b0011);
    /// `signer` values may only be dropped.
    pub const SIGNER: AbilitySet = AbilitySet(0b0010);

    pub fn none() -> Self {
        Self::EMPTY
    }

    pub fn all() -> Self {
        Self::ALL
    }

    pub fn singleton(ability: Ability) -> Self {
        AbilitySet(ability.bit())
    }

    pub fn insert(&mut self, ability: Ability) {
        self.0 |= ability.bit();
    }

    pub fn contains(self, ability: Ability) -> bool {
        self.0 & ability.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Abilities present in `self` but missing from `other`.
    pub fn difference(self, other: AbilitySet) -> AbilitySet {
        AbilitySet(self.0 & !other.0)
    }

    pub fn intersect(self, other: AbilitySet) -> AbilitySet {
        AbilitySet(self.0 & other.0)
    }

    pub fn union(self, other: AbilitySet) -> AbilitySet {
        AbilitySet(self.0 | other.0)
    }

    pub fn is_subset(self, other: AbilitySet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Ability> {
        Ability::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Ability> for AbilitySet {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        let mut set = AbilitySet::EMPTY;
        for ability in iter {
            set.insert(ability);
        }
        set
    }
}

impl fmt::Display for AbilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ability) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}", ability)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn difference_keeps_missing_flags() {
        let required: AbilitySet = [Ability::Copy, Ability::Key].into_iter().collect();
        let provided = AbilitySet::PRIMITIVES;
        let missing = required.difference(provided);
        assert!(!missing.is_empty());
        assert!(missing.contains(Ability::Key));
        assert!(!missing.contains(Ability::Copy));
    }

    #[test]
    fn union_and_intersection_recover_the_consts() {
        let refs = AbilitySet::singleton(Ability::Copy).union(AbilitySet::singleton(Ability::Drop));
        assert_eq!(refs, AbilitySet::REFERENCES);
        assert_eq!(refs.union(AbilitySet::singleton(Ability::Store)), AbilitySet::PRIMITIVES);
        assert_eq!(AbilitySet::ALL.intersect(refs), refs);
        assert_eq!(refs.union(AbilitySet::EMPTY), refs);
    }

    #[test]
    fn subset_of_all() {
        for ability in Ability::ALL {
            assert!(AbilitySet::singleton(ability).is_subset(AbilitySet::ALL));
        }
        assert!(AbilitySet::EMPTY.is_subset(AbilitySet::EMPTY));
        assert!(!AbilitySet::ALL.is_subset(AbilitySet::PRIMITIVES));
    }

    #[test]
    fn display_joins_with_plus() {
        let set: AbilitySet = [Ability::Copy, Ability::Drop, Ability::Store]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "copy + drop + store");
    }
}
