use alloc::vec::Vec;
use core::fmt;
use core::mem;

/// Minimum capacity accepted by [`HashTable::new`].
pub const MIN_CAPACITY: usize = 4;

/// Load-factor threshold, expressed as a ratio. An insert grows the table
/// first when the live count has reached `capacity / DEN * NUM`.
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

/// Derives a slot tag from a hash value.
///
/// The top bit is reserved for the deletion marker in the packed-word
/// encoding this layout descends from, and at least one bit is always set so
/// a real tag can never be the all-zero "never used" pattern. Probe
/// positions are computed from the tag, not the raw hash, so a live entry
/// and the tombstone it leaves behind always agree on probe distance.
#[inline]
fn tag_of(hash: u64) -> u64 {
    (hash & 0x7FFF_FFFF_FFFF_FFFF) | 0x2
}

/// Forward distance from `tag`'s desired position to `pos`, with wraparound.
///
/// `mask` is `capacity - 1`; capacity is a power of two, so masking the
/// wrapped subtraction yields the modular distance.
#[inline]
fn probe_distance(tag: u64, pos: usize, mask: usize) -> usize {
    pos.wrapping_sub(tag as usize) & mask
}

#[inline]
fn max_load(capacity: usize) -> usize {
    // Capacity is a power of two >= 4, so the division is exact.
    capacity / LOAD_FACTOR_DEN * LOAD_FACTOR_NUM
}

/// A single storage position.
///
/// `Empty` means never occupied since the slot array was last allocated; an
/// empty slot terminates any probe chain that could have reached it. A
/// tombstone keeps the tag of the entry that used to live there so probes
/// continuing past it still compute correct distances, but it is eligible to
/// be overwritten by a later insert. Tombstones are dropped for good when
/// the table grows.
#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    Tombstone { tag: u64 },
    Occupied { tag: u64, value: V },
}

/// The error returned by [`HashTable::new`] when the requested capacity is
/// not a power of two of at least [`MIN_CAPACITY`].
///
/// Capacities are never silently rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    requested: usize,
}

impl CapacityError {
    /// The capacity that was rejected.
    pub fn requested(&self) -> usize {
        self.requested
    }
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid capacity {}: must be a power of two of at least {}",
            self.requested, MIN_CAPACITY
        )
    }
}

impl core::error::Error for CapacityError {}

/// An open-addressing hash table using Robin Hood displacement.
///
/// `HashTable<V>` stores values of type `V` and requires the caller to
/// provide a hash value and an equality predicate for each operation, so any
/// hashing strategy can be plugged in. [`crate::HashMap`] wraps this with a
/// [`core::hash::BuildHasher`] for a conventional keyed interface.
///
/// On a collision, the entry that has probed farther from its desired
/// position keeps the slot and the other continues probing ("the rich are
/// robbed"). This keeps probe distances along any run non-decreasing, which
/// lets a lookup stop as soon as it passes a slot whose own probe distance
/// is shorter than the distance probed so far: if the key existed, it would
/// have displaced that slot's tenant. Negative lookups therefore terminate
/// in expected O(1) and worst-case O(log n) probes instead of scanning to
/// the next empty slot. See Sebastian Sylvan's write-up for the analysis:
/// <http://sebastiansylvan.com/2013/05/08/robin-hood-hashing-should-be-your-default-hash-table-implementation/>
///
/// Removal leaves a tombstone; tombstones are reclaimed by later inserts and
/// dropped wholesale when the table grows. Growth doubles the capacity once
/// the live count reaches 3/4 of it.
///
/// The table is not internally synchronized, and growth reallocates the slot
/// array, so references returned by [`find`] must not be held across a
/// mutating call.
///
/// [`find`]: HashTable::find
///
/// ## Example
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use foldhash::fast::RandomState;
/// use rh_hash::HashTable;
///
/// let state = RandomState::default();
/// let mut table: HashTable<(u32, &str)> = HashTable::new(8)?;
///
/// let hash = state.hash_one(7u32);
/// assert!(table.insert(hash, (7, "seven"), |a, b| a.0 == b.0));
/// assert_eq!(table.find(hash, |&(k, _)| k == 7), Some(&(7, "seven")));
/// # Ok::<(), rh_hash::CapacityError>(())
/// ```
#[derive(Clone, Debug)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    len: usize,
}

impl<V> HashTable<V> {
    /// Creates a table with the given capacity.
    ///
    /// The capacity must be a power of two of at least [`MIN_CAPACITY`];
    /// anything else is rejected rather than rounded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashTable;
    ///
    /// let table: HashTable<u64> = HashTable::new(16)?;
    /// assert_eq!(table.capacity(), 16);
    ///
    /// assert!(HashTable::<u64>::new(12).is_err());
    /// assert!(HashTable::<u64>::new(2).is_err());
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        if capacity < MIN_CAPACITY || !capacity.is_power_of_two() {
            return Err(CapacityError {
                requested: capacity,
            });
        }
        let mut slots = Vec::new();
        slots.resize_with(capacity, || Slot::Empty);
        Ok(HashTable { slots, len: 0 })
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current slot-array capacity.
    ///
    /// The table grows once [`len`] reaches 3/4 of this value.
    ///
    /// [`len`]: HashTable::len
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Removes all entries, keeping the allocated capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.len = 0;
    }

    /// Inserts a value, rejecting duplicates.
    ///
    /// `is_duplicate` is called as `is_duplicate(resident, incoming)` for
    /// residents whose tag matches the incoming hash. If it reports a match
    /// the table is left unchanged and `false` is returned; existing values
    /// are never overwritten. Returns `true` once the value is placed.
    ///
    /// Grows the table first if the live count has reached the load-factor
    /// threshold, which invalidates any previously returned references.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::hash::BuildHasher;
    ///
    /// use foldhash::fast::RandomState;
    /// use rh_hash::HashTable;
    ///
    /// let state = RandomState::default();
    /// let mut table: HashTable<(&str, u32)> = HashTable::new(4)?;
    ///
    /// let hash = state.hash_one("hello");
    /// assert!(table.insert(hash, ("hello", 0), |a, b| a.0 == b.0));
    /// assert!(!table.insert(hash, ("hello", 11), |a, b| a.0 == b.0));
    /// assert_eq!(table.find(hash, |&(k, _)| k == "hello"), Some(&("hello", 0)));
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn insert(&mut self, hash: u64, value: V, is_duplicate: impl Fn(&V, &V) -> bool) -> bool {
        if self.len >= max_load(self.slots.len()) {
            self.grow();
        }
        if self.place(tag_of(hash), value, &is_duplicate, true) {
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Returns a reference to the value matching `hash` and `eq`, if any.
    ///
    /// The probe stops at the first empty slot, or as soon as it passes a
    /// slot whose own probe distance is shorter than the distance probed so
    /// far; by the displacement invariant the value cannot live beyond that
    /// point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::hash::BuildHasher;
    ///
    /// use foldhash::fast::RandomState;
    /// use rh_hash::HashTable;
    ///
    /// let state = RandomState::default();
    /// let mut table: HashTable<(u32, u32)> = HashTable::new(8)?;
    ///
    /// let hash = state.hash_one(1u32);
    /// table.insert(hash, (1, 100), |a, b| a.0 == b.0);
    ///
    /// assert_eq!(table.find(hash, |&(k, _)| k == 1), Some(&(1, 100)));
    /// let miss = state.hash_one(2u32);
    /// assert_eq!(table.find(miss, |&(k, _)| k == 2), None);
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let pos = self.find_index(tag_of(hash), &eq)?;
        match &self.slots[pos] {
            Slot::Occupied { value, .. } => Some(value),
            // find_index only returns occupied positions
            _ => None,
        }
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`,
    /// if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::hash::BuildHasher;
    ///
    /// use foldhash::fast::RandomState;
    /// use rh_hash::HashTable;
    ///
    /// let state = RandomState::default();
    /// let mut table: HashTable<(u32, u32)> = HashTable::new(8)?;
    ///
    /// let hash = state.hash_one(1u32);
    /// table.insert(hash, (1, 100), |a, b| a.0 == b.0);
    ///
    /// if let Some(entry) = table.find_mut(hash, |&(k, _)| k == 1) {
    ///     entry.1 += 1;
    /// }
    /// assert_eq!(table.find(hash, |&(k, _)| k == 1), Some(&(1, 101)));
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let pos = self.find_index(tag_of(hash), &eq)?;
        match &mut self.slots[pos] {
            Slot::Occupied { value, .. } => Some(value),
            // find_index only returns occupied positions
            _ => None,
        }
    }

    /// Removes and returns the value matching `hash` and `eq`, if any.
    ///
    /// The slot becomes a tombstone carrying the entry's tag, so probes of
    /// other keys that hashed through it still compute correct distances.
    /// No backward-shift compaction is performed; tombstones accumulate
    /// until the next growth pass reclaims them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use core::hash::BuildHasher;
    ///
    /// use foldhash::fast::RandomState;
    /// use rh_hash::HashTable;
    ///
    /// let state = RandomState::default();
    /// let mut table: HashTable<(u32, u32)> = HashTable::new(8)?;
    ///
    /// let hash = state.hash_one(1u32);
    /// table.insert(hash, (1, 100), |a, b| a.0 == b.0);
    ///
    /// assert_eq!(table.remove(hash, |&(k, _)| k == 1), Some((1, 100)));
    /// assert_eq!(table.remove(hash, |&(k, _)| k == 1), None);
    /// assert!(table.is_empty());
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let pos = self.find_index(tag_of(hash), &eq)?;
        match mem::replace(&mut self.slots[pos], Slot::Empty) {
            Slot::Occupied { tag, value } => {
                self.slots[pos] = Slot::Tombstone { tag };
                self.len -= 1;
                Some(value)
            }
            other => {
                self.slots[pos] = other;
                None
            }
        }
    }

    /// Returns counts of live entries by probe distance.
    ///
    /// Index `d` holds the number of occupied slots whose entry sits `d`
    /// steps past its desired position.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mask = self.slots.len() - 1;
        let mut counts = Vec::new();
        for (pos, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied { tag, .. } = slot {
                let dist = probe_distance(*tag, pos, mask);
                if dist >= counts.len() {
                    counts.resize(dist + 1, 0);
                }
                counts[dist] += 1;
            }
        }
        counts
    }

    /// Runs the displacement probe for an entry carrying `tag`.
    ///
    /// `check_duplicates` is cleared after the first displacement swap: from
    /// then on the carried entry is a resident being shuffled forward, and a
    /// duplicate of it cannot exist by the displacement invariant (nor would
    /// `is_duplicate` describe it any longer).
    fn place(
        &mut self,
        mut tag: u64,
        mut value: V,
        is_duplicate: &impl Fn(&V, &V) -> bool,
        mut check_duplicates: bool,
    ) -> bool {
        let mask = self.slots.len() - 1;
        let mut pos = (tag as usize) & mask;
        let mut dist = 0;
        loop {
            // Each step takes the resident out, decides, and writes the slot
            // back, so every state transition is a plain enum move.
            match mem::replace(&mut self.slots[pos], Slot::Empty) {
                Slot::Empty => {
                    self.slots[pos] = Slot::Occupied { tag, value };
                    return true;
                }
                Slot::Tombstone { tag: resident_tag } => {
                    // A tombstone probing no deeper than the incoming entry
                    // is reclaimed; a deeper one is walked past like any
                    // other resident.
                    if probe_distance(resident_tag, pos, mask) <= dist {
                        self.slots[pos] = Slot::Occupied { tag, value };
                        return true;
                    }
                    self.slots[pos] = Slot::Tombstone { tag: resident_tag };
                }
                Slot::Occupied {
                    tag: resident_tag,
                    value: resident,
                } => {
                    let resident_dist = probe_distance(resident_tag, pos, mask);
                    if check_duplicates
                        && resident_dist == dist
                        && resident_tag == tag
                        && is_duplicate(&resident, &value)
                    {
                        self.slots[pos] = Slot::Occupied {
                            tag: resident_tag,
                            value: resident,
                        };
                        return false;
                    }
                    if resident_dist < dist {
                        // The incoming entry has probed farther, so it takes
                        // the slot and the displaced resident continues from
                        // its own distance. An equal distance is a tie and
                        // does not displace, keeping equal-distance runs in
                        // insertion order.
                        self.slots[pos] = Slot::Occupied { tag, value };
                        tag = resident_tag;
                        value = resident;
                        dist = resident_dist;
                        check_duplicates = false;
                    } else {
                        self.slots[pos] = Slot::Occupied {
                            tag: resident_tag,
                            value: resident,
                        };
                    }
                }
            }
            pos = (pos + 1) & mask;
            dist += 1;
        }
    }

    /// The shared probe for `find`, `find_mut`, and `remove`.
    fn find_index(&self, tag: u64, eq: &impl Fn(&V) -> bool) -> Option<usize> {
        let mask = self.slots.len() - 1;
        let mut pos = (tag as usize) & mask;
        let mut dist = 0;
        loop {
            match &self.slots[pos] {
                Slot::Empty => return None,
                Slot::Tombstone { tag: resident_tag } => {
                    if probe_distance(*resident_tag, pos, mask) < dist {
                        return None;
                    }
                }
                Slot::Occupied {
                    tag: resident_tag,
                    value,
                } => {
                    if probe_distance(*resident_tag, pos, mask) < dist {
                        return None;
                    }
                    if *resident_tag == tag && eq(value) {
                        return Some(pos);
                    }
                }
            }
            pos = (pos + 1) & mask;
            dist += 1;
        }
    }

    /// Doubles the slot array and reinserts every live entry.
    ///
    /// Tombstones are not migrated; their live-count contribution was
    /// already excluded, so the new array starts clean. Reinsertion runs the
    /// ordinary displacement probe with the stored tags, re-establishing the
    /// invariant independently of the prior physical order.
    fn grow(&mut self) {
        let new_capacity = self.slots.len() * 2;
        let mut slots = Vec::new();
        slots.resize_with(new_capacity, || Slot::Empty);
        let old = mem::replace(&mut self.slots, slots);
        for slot in old {
            if let Slot::Occupied { tag, value } = slot {
                // Entries in the old array are distinct, so no duplicate
                // checking is needed.
                self.place(tag, value, &|_: &V, _: &V| false, false);
            }
        }
    }
}
