//! Option lists and their reconciliation.
//!
//! Catalogs render generic options as `key=value, key=value`. [`OptionList`]
//! is the parsed, order-preserving form; [`OptionDelta`] splits the
//! difference between two lists into keys to drop, keys whose value changed,
//! and keys to add.

use indexmap::IndexMap;

use crate::error::{DiffError, Result};
use crate::format::SqlFormatter;

/// An ordered `key -> value` option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    entries: IndexMap<String, String>,
}

impl OptionList {
    /// Parses a catalog-rendered option list.
    ///
    /// Entries are separated by commas; each must contain `=` with a
    /// non-empty key before it. Keys must be unique. An empty string is an
    /// empty (but present) list.
    ///
    /// Only the separator whitespace after a comma is skipped. Keys and
    /// values are kept byte for byte, so `a= 1` and `a=1` differ.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut entries = IndexMap::new();

        for entry in raw.split(',') {
            let entry = entry.trim_start();
            if entry.is_empty() {
                if raw.trim().is_empty() {
                    continue;
                }
                return Err(malformed(entry, "empty entry"));
            }

            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| malformed(entry, "missing '=' between key and value"))?;
            if key.is_empty() {
                return Err(malformed(entry, "empty key"));
            }
            if entries
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                return Err(malformed(entry, "duplicate key"));
            }
        }

        Ok(Self { entries })
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates entries in their original order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates keys in their original order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders `key 'value', ...` for a CREATE statement's OPTIONS clause.
    #[must_use]
    pub fn to_create_clause(&self, fmt: &dyn SqlFormatter) -> String {
        self.iter()
            .map(|(k, v)| format!("{} {}", fmt.quote_ident(k), fmt.quote_literal(v)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn malformed(entry: &str, reason: &'static str) -> DiffError {
    DiffError::MalformedOptionList {
        entry: entry.to_string(),
        reason,
    }
}

/// The three buckets of an option list change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDelta {
    /// Keys only in the old list, in old order.
    pub to_drop: Vec<String>,
    /// Keys in both lists whose value changed, with the new value, in old order.
    pub to_set: Vec<(String, String)>,
    /// Keys only in the new list, with their value, in new order.
    pub to_add: Vec<(String, String)>,
}

impl OptionDelta {
    /// Reconciles two raw, possibly absent, option lists.
    ///
    /// Absent and present lists are never conflated: an absent old list
    /// turns every new key into an addition, an absent new list drops every
    /// old key. Every present list is parsed, so a malformed list fails even
    /// when both sides carry the same text.
    pub fn between(old: Option<&str>, new: Option<&str>) -> Result<Self> {
        match (old, new) {
            (None, None) => Ok(Self::default()),
            (Some(a), Some(b)) if a == b => {
                OptionList::parse(a)?;
                Ok(Self::default())
            }
            (None, Some(b)) => Ok(Self {
                to_add: owned_entries(&OptionList::parse(b)?),
                ..Self::default()
            }),
            (Some(a), None) => Ok(Self {
                to_drop: OptionList::parse(a)?.keys().map(str::to_string).collect(),
                ..Self::default()
            }),
            (Some(a), Some(b)) => Ok(Self::compute(&OptionList::parse(a)?, &OptionList::parse(b)?)),
        }
    }

    /// Computes the buckets between two parsed lists.
    #[must_use]
    pub fn compute(old: &OptionList, new: &OptionList) -> Self {
        let mut delta = Self::default();

        for (key, old_value) in old.iter() {
            match new.get(key) {
                None => delta.to_drop.push(key.to_string()),
                Some(new_value) if new_value != old_value => {
                    delta.to_set.push((key.to_string(), new_value.to_string()));
                }
                Some(_) => {}
            }
        }

        for (key, value) in new.iter() {
            if old.get(key).is_none() {
                delta.to_add.push((key.to_string(), value.to_string()));
            }
        }

        delta
    }

    /// Returns true if no bucket has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_drop.is_empty() && self.to_set.is_empty() && self.to_add.is_empty()
    }

    /// Renders the DROP bucket clauses (`DROP key`).
    #[must_use]
    pub fn drop_clauses(&self, fmt: &dyn SqlFormatter) -> Vec<String> {
        self.to_drop
            .iter()
            .map(|k| format!("DROP {}", fmt.quote_ident(k)))
            .collect()
    }

    /// Renders the SET bucket clauses (`SET key 'value'`).
    #[must_use]
    pub fn set_clauses(&self, fmt: &dyn SqlFormatter) -> Vec<String> {
        self.to_set
            .iter()
            .map(|(k, v)| format!("SET {} {}", fmt.quote_ident(k), fmt.quote_literal(v)))
            .collect()
    }

    /// Renders the ADD bucket clauses (`ADD key 'value'`).
    #[must_use]
    pub fn add_clauses(&self, fmt: &dyn SqlFormatter) -> Vec<String> {
        self.to_add
            .iter()
            .map(|(k, v)| format!("ADD {} {}", fmt.quote_ident(k), fmt.quote_literal(v)))
            .collect()
    }

    /// Groups the rendered clauses into `OPTIONS(...)` bodies.
    ///
    /// With `combined` all clauses go into one body in DROP, SET, ADD order;
    /// otherwise each non-empty bucket gets its own body, in the same order.
    /// Empty buckets never produce a body.
    #[must_use]
    pub fn clause_groups(&self, fmt: &dyn SqlFormatter, combined: bool) -> Vec<String> {
        let buckets = [
            self.drop_clauses(fmt),
            self.set_clauses(fmt),
            self.add_clauses(fmt),
        ];

        if combined {
            let all: Vec<String> = buckets.into_iter().flatten().collect();
            if all.is_empty() {
                Vec::new()
            } else {
                vec![all.join(", ")]
            }
        } else {
            buckets
                .into_iter()
                .filter(|b| !b.is_empty())
                .map(|b| b.join(", "))
                .collect()
        }
    }
}

fn owned_entries(list: &OptionList) -> Vec<(String, String)> {
    list.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
