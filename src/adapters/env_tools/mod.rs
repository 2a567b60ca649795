//! Tool discovery adapter
//!
//! Resolves external binaries on the execution PATH, preferring an
//! explicitly configured location.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::ports::ToolPort;

/// PATH-based tool locator
#[derive(Debug, Clone, Default)]
pub struct PathToolLocator {
    configured: Option<PathBuf>,
}

impl PathToolLocator {
    /// Create a locator that only searches PATH
    pub fn new() -> Self {
        Self { configured: None }
    }

    /// Prefer this path over PATH lookup when it exists
    pub fn with_configured_path(mut self, path: Option<PathBuf>) -> Self {
        self.configured = path;
        self
    }
}

impl ToolPort for PathToolLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        if let Some(path) = &self.configured {
            if path.is_file() {
                debug!("Using configured {} at {}", name, path.display());
                return Some(path.clone());
            }
            debug!("Configured path {} does not exist, searching PATH", path.display());
        }

        let found = which::which(name).ok();
        debug!("PATH lookup for {}: {:?}", name, found);
        found
    }
}

/// Information about an external tool
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub path: Option<PathBuf>,
    /// First line of `-version` output
    pub version: Option<String>,
}

impl ToolInfo {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

/// Locate a tool and ask it for its version
pub fn check_tool(locator: &dyn ToolPort, name: &str) -> ToolInfo {
    let path = locator.locate(name);
    let version = path.as_ref().and_then(|p| {
        Command::new(p)
            .arg("-version")
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .map(|line| line.to_string())
            })
    });

    ToolInfo {
        name: name.to_string(),
        path,
        version,
    }
}
