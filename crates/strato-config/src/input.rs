//! The [`Input`] store: typed lookups with defaulting and usage tracking.

use std::cell::Cell;

use indexmap::IndexMap;

use crate::error::InputError;
use crate::item::FromItem;

/// Fully-qualified name of one configuration entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey {
    /// Block name, e.g. `"advec"`.
    pub block: String,
    /// Item name, e.g. `"cflmax"`.
    pub item: String,
    /// Element name; empty for plain items.
    pub element: String,
}

#[derive(Debug)]
struct Entry {
    value: String,
    used: Cell<bool>,
}

type Elements = IndexMap<String, Entry>;
type Items = IndexMap<String, Elements>;

/// Configuration values keyed by `(block, item, element)`.
///
/// Entries keep insertion order, so [`unused_items`](Self::unused_items)
/// reports in the order the configuration was given.
///
/// # Element lookup
///
/// Asking for `[block][item][element]` returns the element-specific entry
/// if present and otherwise falls back to the plain `[block][item]`
/// entry. This lets one setting be overridden per scalar.
///
/// # Examples
///
/// ```
/// use strato_config::Input;
///
/// let mut input = Input::new();
/// input.insert("advec", "cflmax", "", "1.2").unwrap();
///
/// let cflmax: f64 = input.get_item("advec", "cflmax", "").unwrap();
/// let cflmin: f64 = input.get_item_or("advec", "cflmin", "", 1e-5).unwrap();
/// assert_eq!(cflmax, 1.2);
/// assert_eq!(cflmin, 1e-5);
/// assert!(input.unused_items().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Input {
    blocks: IndexMap<String, Items>,
}

impl Input {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Use an empty `element` for plain items.
    ///
    /// Returns [`InputError::DuplicateItem`] if the entry already exists.
    pub fn insert(
        &mut self,
        block: &str,
        item: &str,
        element: &str,
        value: impl Into<String>,
    ) -> Result<(), InputError> {
        let elements = self
            .blocks
            .entry(block.to_string())
            .or_default()
            .entry(item.to_string())
            .or_default();
        if elements.contains_key(element) {
            return Err(InputError::DuplicateItem {
                block: block.to_string(),
                item: item.to_string(),
                element: element.to_string(),
            });
        }
        elements.insert(
            element.to_string(),
            Entry {
                value: value.into().trim().to_string(),
                used: Cell::new(false),
            },
        );
        Ok(())
    }

    /// Whether an entry exists for the key, honouring element fallback.
    /// Does not mark anything used.
    pub fn contains(&self, block: &str, item: &str, element: &str) -> bool {
        self.find(block, item, element).is_some()
    }

    /// Read a required entry.
    ///
    /// # Errors
    ///
    /// [`InputError::MissingItem`] if absent, [`InputError::WrongType`] if
    /// the value does not convert to `T`.
    pub fn get_item<T: FromItem>(
        &self,
        block: &str,
        item: &str,
        element: &str,
    ) -> Result<T, InputError> {
        match self.find(block, item, element) {
            Some((entry, used_element)) => convert(entry, block, item, used_element),
            None => Err(InputError::MissingItem {
                block: block.to_string(),
                item: item.to_string(),
                element: element.to_string(),
            }),
        }
    }

    /// Read an optional entry, returning `default` when it is absent.
    ///
    /// A present entry is marked used and must still convert to `T`.
    pub fn get_item_or<T: FromItem>(
        &self,
        block: &str,
        item: &str,
        element: &str,
        default: T,
    ) -> Result<T, InputError> {
        match self.find(block, item, element) {
            Some((entry, used_element)) => convert(entry, block, item, used_element),
            None => {
                tracing::debug!(block, item, element, "not set, using default");
                Ok(default)
            }
        }
    }

    /// Mark every element of `[block][item]` as used without reading it.
    ///
    /// For entries another component consumes in bulk, so they do not
    /// show up in [`unused_items`](Self::unused_items). Unknown items are
    /// ignored.
    pub fn flag_as_used(&self, block: &str, item: &str) {
        let Some(elements) = self.blocks.get(block).and_then(|items| items.get(item)) else {
            return;
        };
        for entry in elements.values() {
            entry.used.set(true);
        }
    }

    /// Entries that no lookup has read so far, in insertion order.
    pub fn unused_items(&self) -> Vec<ItemKey> {
        let mut unused = Vec::new();
        for (block, items) in &self.blocks {
            for (item, elements) in items {
                for (element, entry) in elements {
                    if !entry.used.get() {
                        unused.push(ItemKey {
                            block: block.clone(),
                            item: item.clone(),
                            element: element.clone(),
                        });
                    }
                }
            }
        }
        unused
    }

    /// Log a warning for every unused entry. Returns how many there were.
    pub fn warn_unused(&self) -> usize {
        let unused = self.unused_items();
        for key in &unused {
            tracing::warn!(
                block = %key.block,
                item = %key.item,
                element = %key.element,
                "configuration entry is not used"
            );
        }
        unused.len()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    fn find<'a>(
        &'a self,
        block: &str,
        item: &str,
        element: &'a str,
    ) -> Option<(&'a Entry, &'a str)> {
        let elements = self.blocks.get(block)?.get(item)?;
        if let Some(entry) = elements.get(element) {
            return Some((entry, element));
        }
        if element.is_empty() {
            None
        } else {
            elements.get("").map(|entry| (entry, ""))
        }
    }
}

fn convert<T: FromItem>(
    entry: &Entry,
    block: &str,
    item: &str,
    element: &str,
) -> Result<T, InputError> {
    entry.used.set(true);
    T::from_item(&entry.value).ok_or_else(|| InputError::WrongType {
        block: block.to_string(),
        item: item.to_string(),
        element: element.to_string(),
        value: entry.value.clone(),
        expected: T::TYPE_NAME,
    })
}
