//! The ordered rule table behind [`Classifier`](super::Classifier).

use glob_match::glob_match;

use super::BundleName;
use super::module_id::ParsedModuleId;
use crate::error::{Error, Result};

/// A set of package name patterns, e.g. `react`, `d3-*`, `@fullcalendar/*`.
///
/// Patterns are globs matched against the full package name. `*` does not
/// cross the `/` in a scoped name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSet {
    patterns: Vec<String>,
}

impl PackageSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern: String = pattern.into();
                validate_pattern(pattern.trim().to_string())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, package: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| glob_match(pattern, package))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn validate_pattern(pattern: String) -> Result<String> {
    let reason = if pattern.is_empty() {
        Some("pattern is empty")
    } else if pattern.chars().any(char::is_whitespace) {
        Some("pattern contains whitespace")
    } else if pattern.contains('\\') {
        Some("package names never contain backslashes")
    } else if pattern.matches('/').count() > 1 {
        Some("a package name has at most one '/', after its scope")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidPattern {
            pattern,
            reason: reason.to_string(),
        }),
        None => Ok(pattern),
    }
}

/// A first-party source subtree, stored as path segments (`src/apps/liff`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    segments: Vec<String>,
}

impl Subtree {
    pub fn new(path: &str) -> Result<Self> {
        let segments: Vec<String> = path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(Error::InvalidSubtree {
                subtree: path.to_string(),
                reason: "subtree has no path segments".to_string(),
            });
        }
        if segments.iter().any(|s| s == "." || s == "..") {
            return Err(Error::InvalidSubtree {
                subtree: path.to_string(),
                reason: "use a plain path without '.' or '..' segments".to_string(),
            });
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for Subtree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// What a rule checks about a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Third-party module whose package is in the set.
    PackageIn(PackageSet),
    /// Any third-party module.
    ThirdParty,
    /// First-party module under the subtree.
    Under(Subtree),
}

impl Matcher {
    pub(crate) fn matches(&self, module: &ParsedModuleId<'_>) -> bool {
        match self {
            Matcher::PackageIn(set) => module
                .package_name()
                .is_some_and(|name| set.matches(&name.to_full_name())),
            Matcher::ThirdParty => module.is_third_party(),
            Matcher::Under(subtree) => {
                !module.is_third_party() && module.is_under(subtree.segments())
            }
        }
    }
}

/// One row of the rule table: when `matcher` holds, the module goes to `bundle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    label: &'static str,
    matcher: Matcher,
    bundle: BundleName,
}

impl Rule {
    pub fn new(label: &'static str, matcher: Matcher, bundle: BundleName) -> Self {
        Self {
            label,
            matcher,
            bundle,
        }
    }

    /// Short, stable name of the rule for diagnostics.
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn bundle(&self) -> BundleName {
        self.bundle
    }
}
