use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name,
    Mascot,
    Image,
    Personal,
    Backgrounds,
    Classes,
    Extra,
    FunFact,
    Quote,
    Links,
}

impl FieldKey {
    pub const ALL: [FieldKey; 10] = [
        FieldKey::Name,
        FieldKey::Mascot,
        FieldKey::Image,
        FieldKey::Personal,
        FieldKey::Backgrounds,
        FieldKey::Classes,
        FieldKey::Extra,
        FieldKey::FunFact,
        FieldKey::Quote,
        FieldKey::Links,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Mascot => "mascot",
            FieldKey::Image => "image",
            FieldKey::Personal => "personal",
            FieldKey::Backgrounds => "backgrounds",
            FieldKey::Classes => "classes",
            FieldKey::Extra => "extra",
            FieldKey::FunFact => "funfact",
            FieldKey::Quote => "quote",
            FieldKey::Links => "links",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKey::Name => "Name",
            FieldKey::Mascot => "Mascot",
            FieldKey::Image => "Image",
            FieldKey::Personal => "Personal Statement",
            FieldKey::Backgrounds => "Backgrounds",
            FieldKey::Classes => "Classes",
            FieldKey::Extra => "Extra Information",
            FieldKey::FunFact => "Fun Fact / Computer",
            FieldKey::Quote => "Quote",
            FieldKey::Links => "Links",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown field '{key}'")]
pub struct UnknownField {
    pub key: String,
}

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        FieldKey::ALL
            .into_iter()
            .find(|f| f.as_key() == wanted)
            .ok_or(UnknownField {
                key: value.trim().to_string(),
            })
    }
}

/// Which card fields the user wants shown. Every field starts visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleFields {
    flags: BTreeMap<FieldKey, bool>,
}

impl Default for VisibleFields {
    fn default() -> Self {
        Self {
            flags: FieldKey::ALL.into_iter().map(|f| (f, true)).collect(),
        }
    }
}

impl VisibleFields {
    pub fn is_visible(&self, key: FieldKey) -> bool {
        self.flags.get(&key).copied().unwrap_or(true)
    }

    pub fn set(&mut self, key: FieldKey, visible: bool) {
        self.flags.insert(key, visible);
    }

    /// Flips `key` and returns the new state.
    pub fn toggle(&mut self, key: FieldKey) -> bool {
        let next = !self.is_visible(key);
        self.flags.insert(key, next);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, bool)> + '_ {
        self.flags.iter().map(|(k, v)| (*k, *v))
    }

    pub fn hidden(&self) -> Vec<FieldKey> {
        self.iter().filter(|(_, v)| !v).map(|(k, _)| k).collect()
    }
}
