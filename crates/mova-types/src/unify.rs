//! Index-based union-find tables for inference variables.
//!
//! Each table owns a growable arena of slots; a variable is an index into
//! that arena. A slot either redirects to another slot or is a root carrying
//! an optional resolved value plus a union-by-rank counter. Path compression
//! rewrites traversed redirects in place, giving amortized near-O(1) lookups
//! without any shared mutable node graph.
//!
//! Two instantiations exist: the general table (`TyVar` keys, `Ty` values)
//! and the integer-width table (`IntVar` keys, `IntegerKind` values).

use std::marker::PhantomData;

/// A key into a [`UnificationTable`] arena.
pub trait UnifyKey: Copy + Eq {
    fn from_index(index: u32) -> Self;
    fn index(self) -> u32;
}

macro_rules! unify_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl UnifyKey for $name {
            fn from_index(index: u32) -> Self {
                $name(index)
            }

            fn index(self) -> u32 {
                self.0
            }
        }
    };
}

unify_key! {
    /// A general type inference variable.
    TyVar
}
unify_key! {
    /// An integer-width inference variable.
    IntVar
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// This variable has been linked under another one.
    Redirect(K),
    /// Representative of its equivalence class. `value` is `None` while the
    /// class is still unresolved.
    Root { value: Option<V>, rank: u32 },
}

/// Arena-backed union-find with values attached to class roots.
#[derive(Debug, Clone)]
pub struct UnificationTable<K, V> {
    slots: Vec<Slot<K, V>>,
    _key: PhantomData<K>,
}

impl<K, V> Default for UnificationTable<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            _key: PhantomData,
        }
    }
}

impl<K: UnifyKey, V: Clone> UnificationTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh unresolved variable (its own root, rank 0).
    pub fn new_key(&mut self) -> K {
        let key = K::from_index(self.slots.len() as u32);
        self.slots.push(Slot::Root {
            value: None,
            rank: 0,
        });
        key
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Find the representative of `key`'s class, compressing the traversed
    /// path so later lookups are a single hop.
    pub fn find(&mut self, key: K) -> K {
        let mut root = key;
        while let Slot::Redirect(next) = &self.slots[root.index() as usize] {
            root = *next;
        }
        // Second pass: point everything on the walked chain at the root.
        let mut current = key;
        while let Slot::Redirect(next) = &self.slots[current.index() as usize] {
            let next = *next;
            self.slots[current.index() as usize] = Slot::Redirect(root);
            current = next;
        }
        root
    }

    /// Non-mutating variant of [`find`](Self::find) for queries against a
    /// finalized table. Walks the redirect chain without compressing it.
    pub fn peek(&self, key: K) -> K {
        let mut root = key;
        while let Slot::Redirect(next) = &self.slots[root.index() as usize] {
            root = *next;
        }
        root
    }

    /// The resolved value of `key`'s class, or `None` while it is still a
    /// variable. Distinguishing those two is the caller's business: a class
    /// resolved to an "unknown" value is not the same as an unresolved class.
    pub fn probe_value(&mut self, key: K) -> Option<V> {
        let root = self.find(key);
        match &self.slots[root.index() as usize] {
            Slot::Root { value, .. } => value.clone(),
            Slot::Redirect(_) => unreachable!("find returned a redirect"),
        }
    }

    /// Like [`probe_value`](Self::probe_value) but without path compression.
    pub fn peek_value(&self, key: K) -> Option<V> {
        let root = self.peek(key);
        match &self.slots[root.index() as usize] {
            Slot::Root { value, .. } => value.clone(),
            Slot::Redirect(_) => unreachable!("peek returned a redirect"),
        }
    }

    /// Merge the classes of `a` and `b`, linking the lower-rank root under
    /// the higher-rank one. Linking two unresolved variables cannot fail; if
    /// one side already carries a value the merged class keeps it.
    pub fn unify_var_var(&mut self, a: K, b: K) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        let (rank_a, value_a) = self.root_parts(root_a);
        let (rank_b, value_b) = self.root_parts(root_b);
        let merged = value_a.or(value_b);
        let (winner, loser, bump) = if rank_a > rank_b {
            (root_a, root_b, false)
        } else if rank_b > rank_a {
            (root_b, root_a, false)
        } else {
            (root_a, root_b, true)
        };
        let rank = self.rank_of(winner) + if bump { 1 } else { 0 };
        self.slots[loser.index() as usize] = Slot::Redirect(winner);
        self.slots[winner.index() as usize] = Slot::Root {
            value: merged,
            rank,
        };
    }

    /// Resolve `key`'s class to `value` if it is still unresolved.
    ///
    /// If the root already carries a value, that value is returned untouched
    /// and nothing is written: reconciling two resolutions is a solver
    /// decision, never the table's.
    pub fn unify_var_value(&mut self, key: K, value: V) -> Option<V> {
        let root = self.find(key);
        match &mut self.slots[root.index() as usize] {
            Slot::Root {
                value: existing, ..
            } => match existing {
                Some(old) => Some(old.clone()),
                None => {
                    *existing = Some(value);
                    None
                }
            },
            Slot::Redirect(_) => unreachable!("find returned a redirect"),
        }
    }

    fn root_parts(&self, root: K) -> (u32, Option<V>) {
        match &self.slots[root.index() as usize] {
            Slot::Root { value, rank } => (*rank, value.clone()),
            Slot::Redirect(_) => unreachable!("not a root"),
        }
    }

    fn rank_of(&self, root: K) -> u32 {
        self.root_parts(root).0
    }
}
