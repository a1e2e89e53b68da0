//! Identity document selectors
//!
//! The federation API accepts one of three identity documents. Each selector
//! has a fixed label (shown in the form) and a query parameter name.

use serde::Serialize;
use std::fmt;

/// Kind of identity document used to search for licenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentKind {
    /// Spanish national ID or foreigner ID (DNI/NIE)
    DniNie,
    /// Passport or residence document
    Passport,
    /// Catalan health service card (CatSalut)
    CatSalut,
}

impl DocumentKind {
    /// All selectors in form order (the first one is the default selection)
    pub const ALL: [DocumentKind; 3] = [Self::DniNie, Self::Passport, Self::CatSalut];

    /// Label shown in the selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::DniNie => "DNI/NIE",
            Self::Passport => "PASSAPORT",
            Self::CatSalut => "CATSALUT",
        }
    }

    /// Query parameter understood by the upstream API
    pub fn query_param(&self) -> &'static str {
        match self {
            Self::DniNie => "nif",
            Self::Passport => "residencia",
            Self::CatSalut => "catsalut",
        }
    }

    /// Parse a selector label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when the input is empty or whitespace only
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// A validated lookup: a known selector and a non-blank, trimmed document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseQuery {
    pub kind: DocumentKind,
    pub document: String,
}

impl LicenseQuery {
    /// Build a query from raw form input.
    ///
    /// Returns `None` for an unknown selector label or a blank document;
    /// neither case reaches the network.
    pub fn parse(kind_label: &str, document: &str) -> Option<Self> {
        if is_blank(document) {
            return None;
        }
        let kind = DocumentKind::from_label(kind_label)?;
        Some(Self {
            kind,
            document: document.trim().to_string(),
        })
    }
}
