//! Declaration fragments

use super::{CacheMode, CacheProperty};
use serde::{Deserialize, Serialize};

/// One cache declaration found at one declaration site.
///
/// Each named slot holds the mode for its property; `all` applies to every
/// property whose own slot is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclarationFragment {
    /// Catch-all slot
    pub all: CacheMode,
    /// Visibility slot
    pub visibility: CacheMode,
    /// Enablement slot
    pub enablement: CacheMode,
    /// Title slot
    pub title: CacheMode,
    /// Value slot
    pub value: CacheMode,
    /// Options slot
    pub options: CacheMode,
}

impl DeclarationFragment {
    /// Fragment with every slot unspecified
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment deciding every property through the catch-all slot
    pub fn all(mode: CacheMode) -> Self {
        Self::new().with_all(mode)
    }

    /// Set the slot of one property
    pub fn with(mut self, property: CacheProperty, mode: CacheMode) -> Self {
        *self.slot_mut(property) = mode;
        self
    }

    /// Set the catch-all slot
    pub fn with_all(mut self, mode: CacheMode) -> Self {
        self.all = mode;
        self
    }

    /// Mode in the named slot of `property`
    pub fn slot(&self, property: CacheProperty) -> CacheMode {
        match property {
            CacheProperty::Visibility => self.visibility,
            CacheProperty::Enablement => self.enablement,
            CacheProperty::Title => self.title,
            CacheProperty::Value => self.value,
            CacheProperty::Options => self.options,
        }
    }

    fn slot_mut(&mut self, property: CacheProperty) -> &mut CacheMode {
        match property {
            CacheProperty::Visibility => &mut self.visibility,
            CacheProperty::Enablement => &mut self.enablement,
            CacheProperty::Title => &mut self.title,
            CacheProperty::Value => &mut self.value,
            CacheProperty::Options => &mut self.options,
        }
    }

    /// Decision of this fragment for `property`: the named slot, else the
    /// catch-all slot, `None` when both are unspecified
    pub fn decide(&self, property: CacheProperty) -> Option<CacheMode> {
        [self.slot(property), self.all]
            .into_iter()
            .find(|mode| mode.is_specified())
    }

    /// Whether no slot holds a decision
    pub fn is_empty(&self) -> bool {
        !self.all.is_specified()
            && CacheProperty::ALL
                .into_iter()
                .all(|property| !self.slot(property).is_specified())
    }
}
