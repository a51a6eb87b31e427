use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hash_table::CapacityError;
use crate::hash_table::HashTable;
use crate::hash_table::MIN_CAPACITY;

/// A hash map implemented using the Robin Hood HashTable as the underlying
/// storage.
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys,
/// defaulting to [`foldhash::fast::RandomState`]. The underlying storage
/// uses the Robin Hood displacement algorithm provided by the
/// [`HashTable`].
///
/// Unlike the standard map, `insert` rejects duplicate keys instead of
/// replacing the stored value; use [`get_mut`] to update a value in place.
///
/// [`get_mut`]: HashMap::get_mut
#[derive(Clone)]
pub struct HashMap<K, V, S = foldhash::fast::RandomState> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash map with the given hasher builder.
    ///
    /// The map starts at the minimum table capacity and grows as needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use siphasher::sip::SipHasher;
    ///
    /// use rh_hash::HashMap;
    ///
    /// #[derive(Default)]
    /// struct SimpleHasher;
    /// impl core::hash::BuildHasher for SimpleHasher {
    ///     type Hasher = SipHasher;
    ///
    ///     fn build_hasher(&self) -> Self::Hasher {
    ///         SipHasher::new()
    ///     }
    /// }
    ///
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(MIN_CAPACITY).expect("the minimum capacity is a valid capacity"),
            hash_builder,
        }
    }

    /// Creates a new hash map with the specified capacity and hasher
    /// builder.
    ///
    /// The capacity must be a power of two of at least 4; anything else is
    /// rejected rather than rounded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foldhash::fast::RandomState;
    /// use rh_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> =
    ///     HashMap::with_capacity_and_hasher(64, RandomState::default())?;
    /// assert_eq!(map.capacity(), 64);
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn with_capacity_and_hasher(
        capacity: usize,
        hash_builder: S,
    ) -> Result<Self, CapacityError> {
        Ok(Self {
            table: HashTable::new(capacity)?,
            hash_builder,
        })
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert!(map.is_empty());
    /// map.insert(1, "a");
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current capacity of the underlying table.
    ///
    /// The table grows once [`len`] reaches 3/4 of this value.
    ///
    /// [`len`]: HashMap::len
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all entries from the map, keeping the allocated capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Inserts a key-value pair, rejecting duplicate keys.
    ///
    /// Returns `true` if the pair was inserted. If the key is already
    /// present the map is left unchanged, including the stored value, and
    /// `false` is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert!(map.insert("hello", 0));
    /// assert!(!map.insert("hello", 11));
    /// assert_eq!(map.get(&"hello"), Some(&0));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_builder.hash_one(&key);
        self.table
            .insert(hash, (key, value), |(resident, _), (incoming, _)| {
                resident == incoming
            })
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, "a");
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning `true` if it was present.
    ///
    /// The vacated slot becomes a tombstone in the underlying table until
    /// the next growth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, "a");
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key).is_some()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash map using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash map with the specified capacity using the default
    /// hasher builder.
    ///
    /// The capacity must be a power of two of at least 4; anything else is
    /// rejected rather than rounded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rh_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::with_capacity(4)?;
    /// assert_eq!(map.capacity(), 4);
    ///
    /// assert!(HashMap::<i32, String>::with_capacity(12).is_err());
    /// # Ok::<(), rh_hash::CapacityError>(())
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}
