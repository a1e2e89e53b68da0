//! License status codes
//!
//! The upstream reports the administrative state of a license as a short
//! code. Only `LLIESTTRA` means the license is fully processed.

/// Status code of a fully processed license
pub const PROCESSED: &str = "LLIESTTRA";

/// Label shown for codes outside the known set
pub const UNKNOWN_LABEL: &str = "???";

/// Known license states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseStatus {
    PreRegistered,
    Validated,
    Invoiced,
    Processed,
    Cancelled,
}

impl LicenseStatus {
    /// Parse an upstream status code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "LLIESTPRE" => Some(Self::PreRegistered),
            "LLIESTVAL" => Some(Self::Validated),
            "LLIESTFAC" => Some(Self::Invoiced),
            PROCESSED => Some(Self::Processed),
            "LLIESTANU" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Catalan label
    pub fn label(&self) -> &'static str {
        match self {
            Self::PreRegistered => "PREinscrita",
            Self::Validated => "VALidada",
            Self::Invoiced => "FACturada",
            Self::Processed => "TRAmitada",
            Self::Cancelled => "ANUl.lada",
        }
    }
}

/// Human-readable label for a raw status code, `???` when unknown
pub fn status_label(code: &str) -> &'static str {
    LicenseStatus::from_code(code).map_or(UNKNOWN_LABEL, |s| s.label())
}
