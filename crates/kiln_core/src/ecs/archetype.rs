// archetype.rs - Archetype identification and classification
//
// An archetype is the exact set of components an entity has active. Its ID
// is a bitset keyed by registry index, so two entities with the same active
// set always share an ID.

use crate::ecs::{ComponentType, EntityMemoryPool};
use std::collections::HashMap;
use std::fmt;

/// Bitset of active components: bit `k` is set when the component with
/// registry index `k` is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ArchetypeId(u64);

impl ArchetypeId {
    /// Width of the bitset.
    pub const MAX_COMPONENTS: usize = u64::BITS as usize;

    /// No components active.
    pub const EMPTY: ArchetypeId = ArchetypeId(0);

    pub fn from_types(types: &[ComponentType]) -> Self {
        types.iter().fold(Self::EMPTY, |id, &ty| id.with(ty))
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn with(self, ty: ComponentType) -> Self {
        Self(self.0 | (1 << ty.index()))
    }

    #[inline]
    #[must_use]
    pub const fn without(self, ty: ComponentType) -> Self {
        Self(self.0 & !(1 << ty.index()))
    }

    #[inline]
    pub const fn contains(self, ty: ComponentType) -> bool {
        self.0 & (1 << ty.index()) != 0
    }

    /// True when every component in `requirement` is also in `self`.
    #[inline]
    pub const fn is_superset_of(self, requirement: ArchetypeId) -> bool {
        self.0 & requirement.0 == requirement.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Component types in registry-index order.
    pub fn types(self) -> impl Iterator<Item = ComponentType> {
        ComponentType::ALL
            .iter()
            .copied()
            .filter(move |&ty| self.contains(ty))
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, ty) in self.types().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(ty.name())?;
        }
        f.write_str("}")
    }
}

/// Map from archetype to the entities that currently have exactly that
/// composition.
///
/// The map is rebuilt wholesale from the pool rather than patched. It goes
/// stale as soon as any component is toggled and stays that way until the
/// next rebuild.
#[derive(Debug, Default)]
pub struct ArchetypeManager {
    buckets: HashMap<ArchetypeId, Vec<usize>>,
}

impl ArchetypeManager {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    /// Compute the archetype of slot `index` by checking every registered
    /// component, in registry order.
    pub fn generate_archetype_id(pool: &EntityMemoryPool, index: usize) -> ArchetypeId {
        let mut id = ArchetypeId::EMPTY;
        for &ty in ComponentType::ALL {
            if pool.is_active(ty, index) {
                id = id.with(ty);
            }
        }
        id
    }

    /// Clear the map and classify each entity in `entities`, preserving the
    /// given order within each bucket.
    ///
    /// Costs O(entities x component types); the full scan is what keeps
    /// lookups afterwards O(1).
    pub fn rebuild_all<I>(&mut self, pool: &EntityMemoryPool, entities: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.buckets.clear();
        let mut classified = 0usize;
        for index in entities {
            let id = Self::generate_archetype_id(pool, index);
            self.buckets.entry(id).or_default().push(index);
            classified += 1;
        }
        tracing::debug!(
            entities = classified,
            archetypes = self.buckets.len(),
            "rebuilt archetype map"
        );
    }

    /// Classify every slot of the pool, in use or not. Unused slots land in
    /// the empty archetype.
    pub fn rebuild_pool(&mut self, pool: &EntityMemoryPool) {
        self.rebuild_all(pool, 0..pool.capacity());
    }

    /// Entities whose composition is exactly `requirement`.
    ///
    /// An empty slice means no entity has that composition right now; callers
    /// skip their work for this tick.
    pub fn exact_match(&self, requirement: ArchetypeId) -> &[usize] {
        self.buckets
            .get(&requirement)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entities having at least the components in `requirement`.
    ///
    /// Buckets are concatenated in ascending archetype-bit order; entities
    /// keep their insertion order within a bucket.
    pub fn inclusive_match(&self, requirement: ArchetypeId) -> Vec<usize> {
        let mut matching: Vec<(&ArchetypeId, &Vec<usize>)> = self
            .buckets
            .iter()
            .filter(|(id, _)| id.is_superset_of(requirement))
            .collect();
        matching.sort_unstable_by_key(|(id, _)| **id);

        matching
            .into_iter()
            .flat_map(|(_, entities)| entities.iter().copied())
            .collect()
    }

    /// Bucket containing `index`, if it was classified by the last rebuild.
    pub fn archetype_of(&self, index: usize) -> Option<ArchetypeId> {
        self.buckets
            .iter()
            .find(|(_, entities)| entities.contains(&index))
            .map(|(id, _)| *id)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of entities classified by the last rebuild.
    pub fn entity_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArchetypeId, &[usize])> {
        self.buckets.iter().map(|(id, v)| (*id, v.as_slice()))
    }
}
