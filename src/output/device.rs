//! Device classification from the host's user agent.

use std::sync::OnceLock;

use regex::Regex;

/// Class of device a print request originates from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    /// Phones and tablets, whose browsers cannot print from a hidden frame.
    Mobile,
    Desktop,
}

const MOBILE_PATTERN: &str = r"(?i)android|webos|iphone|ipad|ipod|blackberry|iemobile|opera mini";

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(MOBILE_PATTERN).expect("mobile pattern compiles"))
}

impl DeviceClass {
    /// Classifies a user agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if mobile_pattern().is_match(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}
