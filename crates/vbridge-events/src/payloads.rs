//! Event payloads delivered by the host.

use std::collections::BTreeMap;

/// Parameter carrying the new value of a `*Set` notification.
pub const VALUE_PARAM: &str = "value";

/// Key/value parameters attached to a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyParams(BTreeMap<String, String>);

impl PropertyParams {
    /// Empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters holding just a `value` entry.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        let mut params = Self::new();
        params.insert(VALUE_PARAM, value);
        params
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The `value` parameter, if present.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.get(VALUE_PARAM)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// The four notification callbacks of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyEventKind {
    /// A property was set.
    Set,
    /// A property was deleted.
    Deleted,
    /// An XML-sourced property was set.
    XmlSet,
    /// An XML-sourced property was deleted.
    XmlDeleted,
}

impl PropertyEventKind {
    /// Machine-friendly discriminator for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "property_set",
            Self::Deleted => "property_deleted",
            Self::XmlSet => "xml_property_set",
            Self::XmlDeleted => "xml_property_deleted",
        }
    }

    /// Whether the event assigns a value; XML variants count as their plain
    /// counterparts.
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set | Self::XmlSet)
    }
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEvent {
    /// Which callback produced the event.
    pub kind: PropertyEventKind,
    /// Host property key.
    pub key: String,
    /// Parameters supplied with the notification.
    pub params: PropertyParams,
}

impl PropertyEvent {
    /// Build an event.
    #[must_use]
    pub fn new(kind: PropertyEventKind, key: impl Into<String>, params: PropertyParams) -> Self {
        Self {
            kind,
            key: key.into(),
            params,
        }
    }

    /// Convenience constructor for a plain set with a `value` parameter.
    #[must_use]
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(PropertyEventKind::Set, key, PropertyParams::with_value(value))
    }

    /// Convenience constructor for a plain delete.
    #[must_use]
    pub fn deleted(key: impl Into<String>) -> Self {
        Self::new(PropertyEventKind::Deleted, key, PropertyParams::new())
    }
}
