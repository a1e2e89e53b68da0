//! Report rendering
//!
//! Turns mapped licenses into display blocks. The blocks are format-neutral;
//! `lines()` gives the plain-text form used by the CLI and the HTML page.

use super::record::License;
use serde::Serialize;
use std::fmt;

/// What is shown for one license
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Processed athlete license: full details
    Detail {
        index: usize,
        code: String,
        athlete: String,
        club: String,
        season: String,
        category: String,
    },
    /// Athlete license still in progress (or cancelled)
    NotProcessed {
        index: usize,
        status_code: String,
        status_label: &'static str,
    },
    /// Coach, official or any other non-athlete license
    NotAthlete { index: usize },
}

impl Block {
    /// Classify one license. `index` is 1-based, in response order.
    pub fn for_license(index: usize, license: &License) -> Self {
        if !license.is_athlete() {
            return Self::NotAthlete { index };
        }
        if license.is_processed() {
            Self::Detail {
                index,
                code: license.code.clone(),
                athlete: license.athlete.clone(),
                club: license.club.clone(),
                season: license.season.clone(),
                category: license.category.clone(),
            }
        } else {
            Self::NotProcessed {
                index,
                status_code: license.status.clone(),
                status_label: license.status_label(),
            }
        }
    }

    /// Text lines for this block
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Detail {
                index,
                code,
                athlete,
                club,
                season,
                category,
            } => vec![
                format!("LLicència {} ------", index),
                format!("Codi: {}", code),
                format!("Esportista: {}", athlete),
                format!("Club: {}", club),
                format!("Tipus: {} | {}", season, category),
            ],
            Self::NotProcessed {
                index,
                status_code,
                status_label,
            } => vec![format!(
                " Llicència {} - no està tramitada. Estat: {} ({})",
                index, status_label, status_code
            )],
            Self::NotAthlete { index } => {
                vec![format!(" Llicència {} - no és de tipus Esportista", index)]
            }
        }
    }
}

/// Result of one lookup, ready to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Every returned license, athletes or not
    pub found: usize,
    pub blocks: Vec<Block>,
}

impl Report {
    pub fn new(licenses: &[License]) -> Self {
        Self {
            found: licenses.len(),
            blocks: licenses
                .iter()
                .enumerate()
                .map(|(i, license)| Block::for_license(i + 1, license))
                .collect(),
        }
    }

    /// Header line with the license count
    pub fn summary(&self) -> String {
        format!("Num. llicències trobades: {}", self.found)
    }

    /// All text lines: summary first, then each block
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.summary())
            .chain(self.blocks.iter().flat_map(Block::lines))
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
