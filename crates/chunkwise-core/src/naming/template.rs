//! Output path templates such as `js/{logicalName}-{contentHash}.js`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which kind of output a template names. Decides the allowed placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Entry,
    Chunk,
    Asset,
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TemplateKind::Entry => "entry",
            TemplateKind::Chunk => "chunk",
            TemplateKind::Asset => "asset",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    LogicalName,
    SourceStem,
    ContentHash,
    Dir,
    Ext,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "logicalName" => Some(Placeholder::LogicalName),
            "sourceStem" => Some(Placeholder::SourceStem),
            "contentHash" => Some(Placeholder::ContentHash),
            "dir" => Some(Placeholder::Dir),
            "ext" => Some(Placeholder::Ext),
            _ => None,
        }
    }

    fn allowed_in(self, kind: TemplateKind) -> bool {
        match self {
            Placeholder::LogicalName | Placeholder::ContentHash => true,
            Placeholder::SourceStem => kind == TemplateKind::Chunk,
            Placeholder::Dir | Placeholder::Ext => kind == TemplateKind::Asset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Placeholder(Placeholder),
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TemplateValues<'a> {
    pub logical_name: &'a str,
    pub source_stem: &'a str,
    pub content_hash: &'a str,
    pub dir: &'a str,
    pub ext: Option<&'a str>,
}

/// A parsed, validated output path template.
///
/// Every template contains `{contentHash}`, so any change to a file's
/// content yields a new output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPathTemplate {
    source: String,
    kind: TemplateKind,
    parts: Vec<Part>,
}

impl OutputPathTemplate {
    /// Parse `template` for outputs of `kind`.
    ///
    /// # Errors
    ///
    /// Fails on an empty template, an unclosed `{`, an unknown placeholder, a
    /// placeholder the kind does not provide, or a missing `{contentHash}`.
    pub fn parse(template: &str, kind: TemplateKind) -> Result<Self> {
        if template.trim().is_empty() {
            return Err(Error::EmptyTemplate);
        }

        let mut parts = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            if open > 0 {
                parts.push(Part::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| Error::UnclosedPlaceholder {
                template: template.to_string(),
            })?;
            let name = &after[..close];
            let placeholder =
                Placeholder::parse(name).ok_or_else(|| Error::UnknownPlaceholder {
                    name: name.to_string(),
                    template: template.to_string(),
                })?;
            if !placeholder.allowed_in(kind) {
                return Err(Error::UnsupportedPlaceholder {
                    name: name.to_string(),
                    kind,
                });
            }
            parts.push(Part::Placeholder(placeholder));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }

        if !parts.contains(&Part::Placeholder(Placeholder::ContentHash)) {
            return Err(Error::MissingContentHash {
                template: template.to_string(),
            });
        }

        Ok(Self {
            source: template.to_string(),
            kind,
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    /// Render the template.
    ///
    /// A missing `{ext}` drops the `.` in front of it, so `logo-{contentHash}.{ext}`
    /// renders as `logo-1a2b3c4d` for a file without an extension.
    pub(crate) fn render(&self, values: &TemplateValues<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 32);
        for part in &self.parts {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Placeholder(Placeholder::LogicalName) => out.push_str(values.logical_name),
                Part::Placeholder(Placeholder::SourceStem) => out.push_str(values.source_stem),
                Part::Placeholder(Placeholder::ContentHash) => out.push_str(values.content_hash),
                Part::Placeholder(Placeholder::Dir) => out.push_str(values.dir),
                Part::Placeholder(Placeholder::Ext) => match values.ext {
                    Some(ext) => out.push_str(ext),
                    None => {
                        if out.ends_with('.') {
                            out.pop();
                        }
                    }
                },
            }
        }
        out
    }
}

impl std::fmt::Display for OutputPathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_templates() {
        assert!(OutputPathTemplate::parse("js/{logicalName}-{contentHash}.js", TemplateKind::Entry).is_ok());
        assert!(OutputPathTemplate::parse(
            "js/{logicalName}-{sourceStem}-{contentHash}.js",
            TemplateKind::Chunk
        )
        .is_ok());
        assert!(OutputPathTemplate::parse(
            "{dir}/{logicalName}-{contentHash}.{ext}",
            TemplateKind::Asset
        )
        .is_ok());
    }

    #[test]
    fn rejects_template_without_content_hash() {
        let err = OutputPathTemplate::parse("js/{logicalName}.js", TemplateKind::Entry).unwrap_err();
        assert_eq!(
            err,
            Error::MissingContentHash {
                template: "js/{logicalName}.js".to_string()
            }
        );
        assert!(err.to_string().contains("{contentHash}"));
    }

    #[test]
    fn rejects_unknown_and_unclosed_placeholders() {
        assert!(matches!(
            OutputPathTemplate::parse("js/[name]-{hash}.js", TemplateKind::Entry),
            Err(Error::UnknownPlaceholder { .. })
        ));
        assert!(matches!(
            OutputPathTemplate::parse("js/{logicalName-{contentHash}.js", TemplateKind::Entry),
            Err(Error::UnknownPlaceholder { .. }) | Err(Error::UnclosedPlaceholder { .. })
        ));
        assert!(matches!(
            OutputPathTemplate::parse("js/{contentHash}.{", TemplateKind::Entry),
            Err(Error::UnclosedPlaceholder { .. })
        ));
        assert_eq!(
            OutputPathTemplate::parse("  ", TemplateKind::Entry),
            Err(Error::EmptyTemplate)
        );
    }

    #[test]
    fn rejects_placeholders_the_kind_cannot_fill() {
        assert_eq!(
            OutputPathTemplate::parse("js/{sourceStem}-{contentHash}.js", TemplateKind::Entry),
            Err(Error::UnsupportedPlaceholder {
                name: "sourceStem".to_string(),
                kind: TemplateKind::Entry
            })
        );
        assert!(OutputPathTemplate::parse("{dir}/{contentHash}.js", TemplateKind::Chunk).is_err());
    }

    #[test]
    fn render_drops_dot_before_missing_ext() {
        let template =
            OutputPathTemplate::parse("{dir}/{logicalName}-{contentHash}.{ext}", TemplateKind::Asset)
                .unwrap();

        let with_ext = TemplateValues {
            logical_name: "logo",
            content_hash: "1a2b3c4d",
            dir: "images",
            ext: Some("png"),
            ..TemplateValues::default()
        };
        assert_eq!(template.render(&with_ext), "images/logo-1a2b3c4d.png");

        let without_ext = TemplateValues {
            logical_name: "LICENSE",
            content_hash: "1a2b3c4d",
            dir: "assets",
            ext: None,
            ..TemplateValues::default()
        };
        assert_eq!(template.render(&without_ext), "assets/LICENSE-1a2b3c4d");
    }
}
