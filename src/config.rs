//! Report configuration: page profile, letterhead and footer.

use serde::{Deserialize, Serialize};

use crate::assets::DEFAULT_LOGO_PATH;
use crate::layout::PageGeometry;

/// Fixed letterhead printed at the top of every report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyHeader {
    pub name: String,
    pub lines: Vec<String>,
}

impl Default for CompanyHeader {
    fn default() -> Self {
        Self {
            name: "Adroit Swimming Limited".to_owned(),
            lines: vec![
                "207, East Kazipara, Kafrul".to_owned(),
                "Mirpur, Dhaka 1216".to_owned(),
                "Phone: +880-01719371826".to_owned(),
            ],
        }
    }
}

pub const DEFAULT_FOOTER: &str =
    "For more information about pool care visit: www.Adroitswim.com All Rights Reserved.";

/// Everything about a report that is not taken from the record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub page: PageGeometry,
    pub company: CompanyHeader,
    pub footer: String,
    /// Logo path, resolved against the asset loader's base.
    pub logo_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            company: CompanyHeader::default(),
            footer: DEFAULT_FOOTER.to_owned(),
            logo_path: DEFAULT_LOGO_PATH.to_owned(),
        }
    }
}

impl ReportConfig {
    /// Parses a configuration, filling omitted keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
