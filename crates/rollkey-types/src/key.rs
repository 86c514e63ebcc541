//! Rolling keys and their boundary encoding
//!
//! Internally a key is an explicit sequence of validated components. The
//! delimited string form (`1:r1:r2`) only exists at the system boundary:
//! [`Display`](fmt::Display), [`FromStr`], and serde all go through it.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

/// Reserved delimiter joining key components on the wire.
pub const KEY_DELIMITER: char = ':';

/// A single non-empty key component, free of [`KEY_DELIMITER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyComponent(String);

impl KeyComponent {
    pub fn new(value: impl Into<String>) -> Result<Self, KeyError> {
        let value = value.into();
        if value.is_empty() {
            return Err(KeyError::EmptyComponent { position: 0 });
        }
        if value.contains(KEY_DELIMITER) {
            return Err(KeyError::ReservedDelimiter(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for KeyComponent {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KeyComponent {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KeyComponent> for String {
    fn from(component: KeyComponent) -> Self {
        component.0
    }
}

/// Rolling identifier: the append-only history of one identity lineage.
///
/// Always holds at least one component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Key {
    components: Vec<KeyComponent>,
}

impl Key {
    pub fn new(components: Vec<KeyComponent>) -> Result<Self, KeyError> {
        if components.is_empty() {
            return Err(KeyError::Empty);
        }
        Ok(Self { components })
    }

    /// Single-component key.
    pub fn root(component: KeyComponent) -> Self {
        Self {
            components: vec![component],
        }
    }

    /// Parse the delimited boundary form.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        if raw.is_empty() {
            return Err(KeyError::Empty);
        }
        let components = raw
            .split(KEY_DELIMITER)
            .enumerate()
            .map(|(position, part)| {
                if part.is_empty() {
                    Err(KeyError::EmptyComponent { position })
                } else {
                    Ok(KeyComponent(part.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(components)
    }

    pub fn components(&self) -> &[KeyComponent] {
        &self.components
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// First component; lineages never cross a first-component boundary.
    pub fn first(&self) -> &KeyComponent {
        &self.components[0]
    }

    pub fn last(&self) -> &KeyComponent {
        &self.components[self.components.len() - 1]
    }

    /// Append one component.
    pub fn extend(&self, component: KeyComponent) -> Key {
        let mut components = Vec::with_capacity(self.components.len() + 1);
        components.extend_from_slice(&self.components);
        components.push(component);
        Self { components }
    }

    /// Remove an already-matched trailing suffix, component-wise, to recover
    /// the ancestor key.
    pub fn trim_suffix(&self, suffix: &[KeyComponent]) -> Result<Key, KeyError> {
        if !self.components.ends_with(suffix) {
            return Err(KeyError::SuffixMismatch {
                key: self.to_string(),
                suffix: join(suffix),
            });
        }
        let keep = self.components.len() - suffix.len();
        if keep == 0 {
            return Err(KeyError::SuffixConsumesKey {
                key: self.to_string(),
                suffix: join(suffix),
            });
        }
        Ok(Self {
            components: self.components[..keep].to_vec(),
        })
    }

}

fn join(components: &[KeyComponent]) -> String {
    let mut out = String::new();
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            out.push(KEY_DELIMITER);
        }
        out.push_str(component.as_str());
    }
    out
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.components))
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Key {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl From<KeyComponent> for Key {
    fn from(component: KeyComponent) -> Self {
        Self::root(component)
    }
}
