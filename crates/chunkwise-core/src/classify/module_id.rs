//! Parsing of bundler module identifiers into classification inputs.

use std::borrow::Cow;

/// A module identifier split into path segments.
///
/// Identifiers are whatever the bundler hands us: absolute paths, paths
/// relative to the project root, Windows paths, or paths carrying a
/// `?query` suffix. Everything after the first `?` is dropped and both slash
/// styles separate segments. Empty segments are skipped, so a leading `/`
/// makes no difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedModuleId<'a> {
    segments: Vec<&'a str>,
    /// Index of the last segment that names a third-party root.
    vendor_root: Option<usize>,
}

impl<'a> ParsedModuleId<'a> {
    pub(crate) fn parse(id: &'a str, vendor_roots: &[String]) -> Self {
        let path = id.split('?').next().unwrap_or(id);
        let path = path.trim_start_matches('\0');

        let segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
        let vendor_root = segments
            .iter()
            .rposition(|segment| vendor_roots.iter().any(|root| root == segment));

        Self {
            segments,
            vendor_root,
        }
    }

    pub(crate) fn is_third_party(&self) -> bool {
        self.vendor_root.is_some()
    }

    /// Name of the package that owns this module, if it is third-party.
    ///
    /// Scoped packages span two segments (`@tanstack/react-query`). A module
    /// sitting directly in the root directory yields an empty name.
    pub(crate) fn package_name(&self) -> Option<PackageName<'a>> {
        let root = self.vendor_root?;
        let rest = &self.segments[root + 1..];
        let name = match *rest {
            [scope, name, ..] if scope.starts_with('@') => PackageName::Scoped(scope, name),
            [name, ..] => PackageName::Plain(name),
            [] => PackageName::Plain(""),
        };
        Some(name)
    }

    /// Whether the segments contain `subtree` with at least one segment after it.
    pub(crate) fn is_under(&self, subtree: &[String]) -> bool {
        if subtree.is_empty() || self.segments.len() <= subtree.len() {
            return false;
        }

        self.segments
            .windows(subtree.len())
            .enumerate()
            .any(|(start, window)| {
                start + subtree.len() < self.segments.len()
                    && window.iter().zip(subtree).all(|(a, b)| *a == b.as_str())
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PackageName<'a> {
    Plain(&'a str),
    Scoped(&'a str, &'a str),
}

impl<'a> PackageName<'a> {
    pub(crate) fn to_full_name(self) -> Cow<'a, str> {
        match self {
            PackageName::Plain(name) => Cow::Borrowed(name),
            PackageName::Scoped(scope, name) => Cow::Owned(format!("{scope}/{name}")),
        }
    }
}
