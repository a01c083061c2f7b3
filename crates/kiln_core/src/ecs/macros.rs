// macros.rs - Declaration of the closed component set
//
// The component list is fixed at build time. One macro invocation produces
// everything that has to agree on that list: the registry enum, the
// struct-of-arrays pool, the typed `Component` impls and the initializer
// record consumed by scene loaders.

/// Declare the registered component types.
///
/// Each entry is `index => Type in column`, where `index` is the stable
/// registry index (dense, starting at 0, in declaration order) and `column`
/// names the pool field and the `EntityRecord` field.
///
/// # Example
/// ```ignore
/// component_registry! {
///     0 => Meta in meta,
///     1 => Transform in transform,
/// }
/// ```
macro_rules! component_registry {
    ($( $index:literal => $ty:ident in $column:ident ),+ $(,)?) => {
        /// Registry entry for one component type. The discriminant is the
        /// registry index used as the archetype bit position.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum ComponentType {
            $( $ty = $index, )+
        }

        impl ComponentType {
            /// Every registered type, in registry-index order.
            pub const ALL: &'static [ComponentType] = &[$( ComponentType::$ty ),+];

            pub const COUNT: usize = Self::ALL.len();

            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $( ComponentType::$ty => stringify!($ty), )+
                }
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }
        }

        const _: () = {
            let mut i = 0;
            while i < ComponentType::COUNT {
                assert!(
                    ComponentType::ALL[i] as usize == i,
                    "component registry indices must be dense and in declaration order"
                );
                i += 1;
            }
            assert!(
                ComponentType::COUNT <= $crate::ecs::ArchetypeId::MAX_COMPONENTS,
                "too many component types for the archetype bitset"
            );
        };

        /// Struct-of-arrays storage: one column per component type, all of
        /// length `capacity`. Slot `i` of every column describes entity `i`.
        #[derive(Debug, Clone)]
        pub struct EntityMemoryPool {
            capacity: usize,
            $( $column: Vec<$ty>, )+
        }

        impl EntityMemoryPool {
            pub(crate) fn allocate(capacity: usize) -> Self {
                Self {
                    capacity,
                    $( $column: std::iter::repeat_with(<$ty>::default).take(capacity).collect(), )+
                }
            }

            pub(crate) fn resize_columns(&mut self, new_capacity: usize) {
                $( self.$column.resize_with(new_capacity, <$ty>::default); )+
                self.capacity = new_capacity;
            }

            pub(crate) fn reset_columns(&mut self, index: usize) {
                $( self.$column[index] = <$ty>::default(); )+
            }

            /// Shorten one column without touching the others.
            #[cfg(test)]
            pub(crate) fn truncate_column(&mut self, component: ComponentType, len: usize) {
                match component {
                    $( ComponentType::$ty => self.$column.truncate(len), )+
                }
            }

            pub(crate) fn column_lengths(&self) -> [(ComponentType, usize); ComponentType::COUNT] {
                [$( (ComponentType::$ty, self.$column.len()) ),+]
            }

            /// Number of slots in every column.
            #[inline]
            pub fn capacity(&self) -> usize {
                self.capacity
            }

            /// Whether entity `index` currently has `component` active.
            ///
            /// Panics if `index >= capacity`.
            pub fn is_active(&self, component: ComponentType, index: usize) -> bool {
                match component {
                    $( ComponentType::$ty => self.$column[index].active, )+
                }
            }

            /// Toggle a component on or off without touching its payload.
            ///
            /// The archetype map is stale until the next rebuild.
            pub fn set_active(&mut self, component: ComponentType, index: usize, active: bool) {
                match component {
                    $( ComponentType::$ty => self.$column[index].active = active, )+
                }
            }
        }

        $(
            impl $crate::ecs::Component for $ty {
                const TYPE: ComponentType = ComponentType::$ty;
                const NAME: &'static str = stringify!($ty);

                #[inline]
                fn is_active(&self) -> bool {
                    self.active
                }

                #[inline]
                fn set_active(&mut self, active: bool) {
                    self.active = active;
                }

                #[inline]
                fn column(pool: &EntityMemoryPool) -> &[Self] {
                    &pool.$column
                }

                #[inline]
                fn column_mut(pool: &mut EntityMemoryPool) -> &mut [Self] {
                    &mut pool.$column
                }

                #[inline]
                fn record_slot(record: &EntityRecord) -> &Option<Self> {
                    &record.$column
                }

                #[inline]
                fn record_slot_mut(record: &mut EntityRecord) -> &mut Option<Self> {
                    &mut record.$column
                }
            }
        )+

        /// Per-entity initializer handed over by a scene loader.
        ///
        /// A present entry means "this component is active, with this
        /// payload"; an absent entry leaves the component inactive.
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct EntityRecord {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $column: Option<$ty>,
            )+
        }

        impl EntityRecord {
            /// Archetype this record produces once written into a slot.
            pub fn composition(&self) -> $crate::ecs::ArchetypeId {
                let mut id = $crate::ecs::ArchetypeId::EMPTY;
                $(
                    if self.$column.is_some() {
                        id = id.with(ComponentType::$ty);
                    }
                )+
                id
            }

            pub(crate) fn write_into(&self, pool: &mut EntityMemoryPool, index: usize) {
                $(
                    if let Some(value) = &self.$column {
                        let mut value = value.clone();
                        value.active = true;
                        pool.$column[index] = value;
                    }
                )+
            }
        }
    };
}

pub(crate) use component_registry;
