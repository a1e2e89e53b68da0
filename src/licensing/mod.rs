//! License lookup domain
//!
//! Three independent steps:
//! - [`client`]: (selector, document) → raw JSON items (memoized)
//! - [`record`]: JSON item → [`License`]
//! - [`render`]: licenses → [`Report`]

pub mod client;
pub mod document;
pub mod record;
pub mod render;
pub mod status;


pub use client::{ApiConfig, LicenseClient, SharedClient};
pub use document::DocumentKind;
pub use record::License;
pub use render::Report;

/// Run one lookup from raw form input and map the result.
///
/// Returns `None` when the document is blank: no call is made and nothing
/// is shown.
pub fn consult(client: &LicenseClient, kind_label: &str, document: &str) -> Option<Vec<License>> {
    client
        .lookup(kind_label, document)
        .map(|items| License::from_items(&items))
}

/// Like [`consult`], rendered as a report
pub fn consult_report(client: &LicenseClient, kind_label: &str, document: &str) -> Option<Report> {
    consult(client, kind_label, document).map(|licenses| Report::new(&licenses))
}
