//! Table classification.
//!
//! Every table the service fronts is either owned by individual users or
//! shared reference data. Tables outside the catalog are rejected.

use std::collections::HashSet;

use teamfight_core::TableName;

/// How a table is accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// Items belong to a user; writes are gated and counted.
    UserOwned,
    /// Shared data; readable without a token and never written through this service.
    StaticReference,
}

/// The set of tables the service accepts.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    user_owned: HashSet<String>,
    static_reference: HashSet<String>,
}

impl TableCatalog {
    /// User-owned tables of the default catalog.
    pub const DEFAULT_USER_OWNED: [&'static str; 2] = ["tft_builds", "tft_users"];

    /// Static reference tables of the default catalog.
    pub const DEFAULT_STATIC: [&'static str; 5] = [
        "tft_augments",
        "tft_champions",
        "tft_items",
        "tft_traits",
        "tft_set",
    ];

    /// Create a catalog from explicit table lists.
    ///
    /// A table listed in both is treated as user-owned.
    #[must_use]
    pub fn new<U, S>(user_owned: U, static_reference: S) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let user_owned: HashSet<String> = user_owned.into_iter().map(Into::into).collect();
        let static_reference: HashSet<String> = static_reference
            .into_iter()
            .map(Into::into)
            .filter(|name| !user_owned.contains(name))
            .collect();

        Self {
            user_owned,
            static_reference,
        }
    }

    /// Classify a table, or `None` if it is not in the catalog.
    #[must_use]
    pub fn classify(&self, table: &TableName) -> Option<TableClass> {
        if self.user_owned.contains(table.as_str()) {
            Some(TableClass::UserOwned)
        } else if self.static_reference.contains(table.as_str()) {
            Some(TableClass::StaticReference)
        } else {
            None
        }
    }
}

impl Default for TableCatalog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_USER_OWNED, Self::DEFAULT_STATIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(catalog: &TableCatalog, name: &str) -> Option<TableClass> {
        catalog.classify(&name.parse().unwrap())
    }

    #[test]
    fn default_catalog() {
        let catalog = TableCatalog::default();
        assert_eq!(classify(&catalog, "tft_builds"), Some(TableClass::UserOwned));
        assert_eq!(classify(&catalog, "tft_users"), Some(TableClass::UserOwned));
        assert_eq!(
            classify(&catalog, "tft_champions"),
            Some(TableClass::StaticReference)
        );
        assert_eq!(classify(&catalog, "tft_set"), Some(TableClass::StaticReference));
        assert_eq!(classify(&catalog, "tft_secrets"), None);
        assert_eq!(classify(&catalog, "builds"), None);
    }

    #[test]
    fn overlap_is_user_owned() {
        let catalog = TableCatalog::new(["shared"], ["shared", "ref"]);
        assert_eq!(classify(&catalog, "shared"), Some(TableClass::UserOwned));
        assert_eq!(classify(&catalog, "ref"), Some(TableClass::StaticReference));
    }
}
