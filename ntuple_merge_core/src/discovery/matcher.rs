//! File name matching for merge inputs
//!
//! The default policy keeps only the literal prefix of the pattern (the text
//! before the first `*`) and accepts any `.root` file whose name contains that
//! prefix, ignoring case. `out_*.root` therefore also accepts `notout_1.root`.
//! Existing job outputs rely on that looseness, so strict glob matching is an
//! opt-in policy rather than the default.

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ValidationError};

/// Extension every merge input must carry (compared case-insensitively)
pub const TARGET_EXTENSION: &str = "root";

/// How the pattern is applied to file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Case-insensitive substring test of the pattern's literal prefix
    #[default]
    Substring,
    /// Case-insensitive glob match of the whole file name
    Glob,
}

/// Compiled matcher for one pattern
#[derive(Debug, Clone)]
pub struct FileMatcher {
    /// Lowercased literal prefix used by the substring policy
    prefix: String,
    glob: Option<GlobMatcher>,
}

impl FileMatcher {
    /// Compile `pattern` under the given policy
    pub fn new(pattern: &str, policy: MatchPolicy) -> Result<Self> {
        let prefix = literal_prefix(pattern).to_lowercase();

        let glob = match policy {
            MatchPolicy::Substring => None,
            MatchPolicy::Glob => {
                let glob = GlobBuilder::new(pattern)
                    .case_insensitive(true)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| ValidationError::invalid_pattern(pattern, &e.to_string()))?;
                Some(glob.compile_matcher())
            }
        };

        Ok(Self { prefix, glob })
    }

    /// Check a bare file name
    pub fn matches_name(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        if !has_target_extension(&lowered) {
            return false;
        }

        match &self.glob {
            Some(glob) => glob.is_match(file_name),
            None => lowered.contains(&self.prefix),
        }
    }

    /// Check the file name component of a path
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.matches_name(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

/// Text before the first `*`, or the whole pattern when there is none
pub fn literal_prefix(pattern: &str) -> &str {
    pattern.split('*').next().unwrap_or_default()
}

fn has_target_extension(lowered_name: &str) -> bool {
    lowered_name
        .strip_suffix(TARGET_EXTENSION)
        .is_some_and(|stem| stem.ends_with('.'))
}
