//! Sharded string interner shared across render workers.
//!
//! Leaf token text, comment text, and identifier names are interned once and
//! referenced by [`Name`] handles. Rendering multiple files concurrently
//! shares one interner; per-shard locks keep contention low because the
//! interner is read-mostly after parsing.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-shard storage for interned strings.
struct Shard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Interned text, indexed by local index.
    strings: Vec<&'static str>,
}

impl Shard {
    fn new() -> Self {
        Shard {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(128),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }
}

/// Error when a shard exceeds 2^28 strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternOverflow {
    pub shard: usize,
    pub count: usize,
}

impl std::fmt::Display for InternOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "interner shard {} exceeded capacity at {} strings (max {})",
            self.shard,
            self.count,
            Name::MAX_LOCAL
        )
    }
}

impl std::error::Error for InternOverflow {}

/// Sharded string interner.
///
/// O(1) interning and lookup; interned text is leaked so lookups hand out
/// `&'static str` without holding a lock across the caller's use.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::NUM_SHARDS],
    /// Total interned strings across shards, for O(1) `len()`.
    total: AtomicUsize,
}

impl StringInterner {
    /// Create an interner with common Java token text pre-interned.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(Shard::with_empty())
            } else {
                RwLock::new(Shard::new())
            }
        });

        let interner = StringInterner {
            shards,
            total: AtomicUsize::new(1),
        };
        interner.pre_intern_common();
        interner
    }

    /// Pick a shard from the first bytes of the string.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = s.len() as u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Intern a string, returning an error on shard overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternOverflow> {
        let shard_idx = Self::shard_for(s);
        #[allow(clippy::cast_possible_truncation)]
        let shard_tag = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: already interned.
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Name::new(shard_tag, local));
            }
        }

        let mut guard = shard.write();

        // Re-check under the write lock.
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_tag, local));
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let local = u32::try_from(guard.strings.len())
            .ok()
            .filter(|&l| l <= Name::MAX_LOCAL)
            .ok_or(InternOverflow {
                shard: shard_idx,
                count: guard.strings.len(),
            })?;
        guard.strings.push(leaked);
        guard.map.insert(leaked, local);

        self.total.fetch_add(1, Ordering::Relaxed);
        Ok(Name::new(shard_tag, local))
    }

    /// Intern a string.
    ///
    /// # Panics
    /// Panics if a shard exceeds 2^28 strings; use `try_intern` to handle
    /// overflow gracefully.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        match self.try_intern(s) {
            Ok(name) => name,
            Err(e) => panic!("{e}"),
        }
    }

    /// Look up the text for a handle.
    pub fn lookup(&self, name: Name) -> &str {
        let guard = self.shards[name.shard()].read();
        guard.strings[name.local()]
    }

    /// Look up the text as `&'static str`.
    ///
    /// Safe because interned strings are leaked and never deallocated.
    pub fn lookup_static(&self, name: Name) -> &'static str {
        let guard = self.shards[name.shard()].read();
        guard.strings[name.local()]
    }

    /// Number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Check if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern keywords, modifiers, and operator text the formatter
    /// emits constantly, so hot paths stay on the read lock.
    fn pre_intern_common(&self) {
        const COMMON: &[&str] = &[
            // Modifiers
            "public", "protected", "private", "static", "final", "abstract", "native",
            "synchronized", "transient", "volatile", "strictfp",
            // Declaration keywords
            "class", "interface", "enum", "package", "import", "extends", "implements",
            "throws", "void",
            // Statement keywords
            "if", "else", "for", "while", "do", "switch", "case", "default", "try",
            "catch", "finally", "return", "break", "continue", "throw", "new", "assert",
            // Primitive types
            "boolean", "byte", "char", "short", "int", "long", "float", "double",
            // Common literals
            "true", "false", "null", "this", "super", "0", "1",
            // Operators the strategies emit
            "=", "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&", "||",
            "!", "++", "--", "+=", "-=", "*=", "/=", "?", ":",
        ];
        for s in COMMON {
            self.intern(s);
        }
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
