//! Platform detection for capabilities the native chooser may lack.

use regex::Regex;

lazy_static::lazy_static! {
    static ref IOS_DEVICE: Regex = Regex::new(r"iPad|iPod|iPhone").expect("valid regex");
}

/// What the host knows about the environment the chooser runs in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    /// Browser user agent string
    pub user_agent: Option<String>,

    /// Whether the native chooser can pick whole directories
    pub supports_directory: bool,
}

impl Platform {
    pub fn new(user_agent: Option<String>, supports_directory: bool) -> Self {
        Self {
            user_agent,
            supports_directory,
        }
    }

    /// iPad, iPod and iPhone expose the camera through the file chooser.
    pub fn is_ios(&self) -> bool {
        self.user_agent
            .as_deref()
            .is_some_and(|ua| IOS_DEVICE.is_match(ua))
    }
}
