//! Core store domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, currency::Currency};

/// A validated, non-empty store name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct StoreName(String);

impl StoreName {
    /// Create a store name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyStoreName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyStoreName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a store name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for StoreName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a store.
pub type StoreId = i64;

/// A storefront the seller operates on some platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: StoreName,
    /// The marketplace the store lives on, e.g. "Etsy" or "Shopify".
    pub platform: String,
    /// The currency the platform pays out in.
    pub currency: Currency,
}

/// Form data for store creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreFormData {
    pub name: String,
    pub platform: String,
    pub currency: Currency,
}
