//! Order-preserving accumulation and first-seen selection
//!
//! Every "most ..." statistic accumulates into a [`Tally`] and then picks a
//! maximum or minimum. Ties always go to the key that entered the tally
//! first, so results do not depend on hash ordering.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Direction of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Max,
    Min,
}

/// Key and value picked out of a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leader {
    pub key: String,
    pub value: u64,
}

/// Pick the first item with the greatest (or smallest) value
///
/// Comparison is strict, so a later item only replaces the current pick
/// when it is strictly better. Returns `None` for an empty input.
///
/// # Examples
/// ```
/// use tunecup_league::tally::{select_first, Extreme};
///
/// let picked = select_first(["a", "bb", "cc"], Extreme::Max, |s| s.len() as u64);
/// assert_eq!(picked, Some(("bb", 2)));
/// ```
pub fn select_first<T, I, F>(items: I, extreme: Extreme, mut value_of: F) -> Option<(T, u64)>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> u64,
{
    let mut best: Option<(T, u64)> = None;
    for item in items {
        let value = value_of(&item);
        let better = match &best {
            None => true,
            Some((_, current)) => match extreme {
                Extreme::Max => value > *current,
                Extreme::Min => value < *current,
            },
        };
        if better {
            best = Some((item, value));
        }
    }
    best
}

/// Key → total accumulator that remembers first-insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence per key
    pub fn count<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally = Self::new();
        for key in keys {
            tally.add(key, 1);
        }
        tally
    }

    /// Sum amounts per key
    pub fn sum<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut tally = Self::new();
        for (key, amount) in pairs {
            tally.add(key, amount);
        }
        tally
    }

    /// Add `amount` to `key`, creating the entry at the end if new
    ///
    /// Totals saturate at `u64::MAX`.
    pub fn add(&mut self, key: &str, amount: u64) {
        match self.index.get(key) {
            Some(&i) => {
                let total = &mut self.entries[i].1;
                *total = total.saturating_add(amount);
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn max(&self) -> Option<Leader> {
        self.select(Extreme::Max)
    }

    pub fn min(&self) -> Option<Leader> {
        self.select(Extreme::Min)
    }

    fn select(&self, extreme: Extreme) -> Option<Leader> {
        select_first(self.iter(), extreme, |(_, value)| *value).map(|((key, _), value)| Leader {
            key: key.to_string(),
            value,
        })
    }

    /// Drop keys whose total is zero, keeping order
    pub fn without_zeros(self) -> Self {
        Self::sum(
            self.entries
                .iter()
                .filter(|(_, v)| *v > 0)
                .map(|(k, v)| (k.as_str(), *v)),
        )
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
