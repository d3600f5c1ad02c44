//! Whole-build planning: classify every module and name every output.
//!
//! The [`OutputPlanner`] is what a bundler integration calls once per build
//! with everything it knows. The resulting [`OutputPlan`] is plain data and
//! serializes to JSON for tooling.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::assets::AssetCategory;
use crate::classify::{BundleName, Classifier};
use crate::naming::{ChunkNamer, EmittedFile, OutputKind};

pub const DEFAULT_BASE: &str = "/static/dist/";

/// Bundle assignment of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAssignment {
    pub id: String,
    /// `None` means the bundler's default grouping decides.
    pub bundle: Option<BundleName>,
}

/// Output path of one emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFile {
    pub kind: OutputKind,
    pub name: String,
    /// Path relative to the output directory.
    pub path: String,
    /// Public URL under the configured base path.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AssetCategory>,
}

/// Result of planning a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPlan {
    pub modules: Vec<ModuleAssignment>,
    /// Module ids grouped by bundle, in bundle order.
    pub bundles: BTreeMap<BundleName, Vec<String>>,
    pub unassigned: Vec<String>,
    pub files: Vec<PlannedFile>,
}

impl OutputPlan {
    /// Number of modules assigned to a named bundle.
    pub fn assigned_count(&self) -> usize {
        self.bundles.values().map(Vec::len).sum()
    }

    pub fn file(&self, name: &str) -> Option<&PlannedFile> {
        self.files.iter().find(|file| file.name == name)
    }
}

/// Combines a [`Classifier`] and a [`ChunkNamer`] for whole-build planning.
#[derive(Debug, Clone)]
pub struct OutputPlanner {
    classifier: Classifier,
    namer: ChunkNamer,
    base: String,
}

impl OutputPlanner {
    pub fn new(classifier: Classifier, namer: ChunkNamer) -> Self {
        Self {
            classifier,
            namer,
            base: DEFAULT_BASE.to_string(),
        }
    }

    /// Public base path that output URLs are served under.
    ///
    /// A trailing `/` is added when missing.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.base = base;
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn namer(&self) -> &ChunkNamer {
        &self.namer
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Classify `modules` and name `outputs`.
    ///
    /// Duplicate module ids are classified once and keep their first position.
    pub fn plan<'a, S, I>(&self, modules: &[S], outputs: I) -> OutputPlan
    where
        S: AsRef<str> + Sync,
        I: IntoIterator<Item = EmittedFile<'a>>,
    {
        let mut unique: IndexMap<&str, ()> = IndexMap::with_capacity(modules.len());
        for id in modules {
            unique.insert(id.as_ref(), ());
        }
        let ids: Vec<&str> = unique.into_keys().collect();
        let bundles_by_id = self.classifier.classify_all(&ids);

        let mut plan = OutputPlan::default();
        for (id, bundle) in ids.into_iter().zip(bundles_by_id) {
            match bundle {
                Some(name) => plan.bundles.entry(name).or_default().push(id.to_string()),
                None => plan.unassigned.push(id.to_string()),
            }
            plan.modules.push(ModuleAssignment {
                id: id.to_string(),
                bundle,
            });
        }

        for file in outputs {
            let path = self.namer.file_name(&file);
            let category = (file.kind == OutputKind::Asset)
                .then(|| AssetCategory::from_file_name(file.name));
            plan.files.push(PlannedFile {
                kind: file.kind,
                name: file.name.to_string(),
                url: format!("{}{}", self.base, path),
                path,
                category,
            });
        }

        tracing::debug!(
            modules = plan.modules.len(),
            assigned = plan.assigned_count(),
            files = plan.files.len(),
            "planned build output"
        );

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;

    fn planner() -> OutputPlanner {
        OutputPlanner::new(
            Classifier::new(&ClassifierOptions::default()).unwrap(),
            ChunkNamer::default(),
        )
    }

    #[test]
    fn groups_modules_by_bundle() {
        let plan = planner().plan(
            &[
                "node_modules/react/index.js",
                "node_modules/recharts/es6/index.js",
                "src/apps/dashboard/Home.jsx",
                "src/main.jsx",
                "node_modules/react/index.js",
            ],
            [],
        );

        assert_eq!(plan.modules.len(), 4);
        assert_eq!(plan.assigned_count(), 3);
        assert_eq!(plan.unassigned, vec!["src/main.jsx".to_string()]);
        assert_eq!(
            plan.bundles[&BundleName::Vendor],
            vec!["node_modules/react/index.js".to_string()]
        );
        assert!(plan.bundles.contains_key(&BundleName::ChartsVendor));
        assert!(!plan.bundles.contains_key(&BundleName::Shared));
    }

    #[test]
    fn names_files_with_public_urls() {
        let planner = planner().with_base("/static/app");
        let plan = planner.plan::<&str, _>(
            &[],
            [
                EmittedFile {
                    kind: OutputKind::Entry,
                    name: "main",
                    facade_module_id: Some("src/main.jsx"),
                    content: b"main",
                },
                EmittedFile {
                    kind: OutputKind::Asset,
                    name: "logo.svg",
                    facade_module_id: None,
                    content: b"<svg/>",
                },
            ],
        );

        let main = plan.file("main").unwrap();
        assert!(main.path.starts_with("js/main-"));
        assert_eq!(main.url, format!("/static/app/{}", main.path));
        assert_eq!(main.category, None);

        let logo = plan.file("logo.svg").unwrap();
        assert!(logo.path.starts_with("images/logo-"));
        assert_eq!(logo.category, Some(AssetCategory::Image));
    }

    #[test]
    fn plan_serializes_bundle_names_as_tags() {
        let plan = planner().plan(&["src/shared/a.js", "src/b.js"], []);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["modules"][0]["bundle"], "shared");
        assert!(json["modules"][1]["bundle"].is_null());
        assert_eq!(json["bundles"]["shared"][0], "src/shared/a.js");
    }
}
