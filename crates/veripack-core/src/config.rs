//! Caller-owned configuration for a verification run.

/// Selects which checks a verification run performs.
///
/// Each check is independently toggleable; unselected checks produce no
/// outcome in the report. The default runs all four.
///
/// # Examples
///
/// ```
/// use veripack_core::CheckConfig;
///
/// let all = CheckConfig::default();
/// assert!(all.fixity);
///
/// let mut only_fixity = CheckConfig::none();
/// only_fixity.fixity = true;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    /// Run the manifest schema validity check.
    pub validity: bool,
    /// Run the completeness check.
    pub completeness: bool,
    /// Run the fixity check.
    pub fixity: bool,
    /// Run the orphan detection check.
    pub orphans: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            validity: true,
            completeness: true,
            fixity: true,
            orphans: true,
        }
    }
}

impl CheckConfig {
    /// A configuration with every check disabled.
    #[must_use]
    pub fn none() -> Self {
        Self {
            validity: false,
            completeness: false,
            fixity: false,
            orphans: false,
        }
    }
}
