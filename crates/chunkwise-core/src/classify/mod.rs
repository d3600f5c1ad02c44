//! Module-to-bundle classification.
//!
//! The [`Classifier`] assigns every module the bundler reports to one of the
//! named output bundles in [`BundleName`], or leaves it unassigned so the
//! bundler's default grouping applies.
//!
//! Classification walks an ordered rule table and the first matching rule
//! wins. Order matters because categories overlap: a charting library is
//! also a third-party module, so the charting rule must be tried before the
//! catch-all vendor rule.
//!
//! | # | rule                 | matches                                  | bundle            |
//! |---|----------------------|------------------------------------------|-------------------|
//! | 1 | `core-framework`     | third-party, package in the framework set | `vendor`          |
//! | 2 | `charting-library`   | third-party, package in the charting set  | `charts-vendor`   |
//! | 3 | `calendar-library`   | third-party, package in the calendar set  | `calendar-vendor` |
//! | 4 | `third-party`        | any other third-party module              | `vendor`          |
//! | 5 | `dashboard-app`      | first-party, under the dashboard subtree  | `dashboard-app`   |
//! | 6 | `liff-app`           | first-party, under the liff subtree       | `liff-app`        |
//! | 7 | `shared`             | first-party, under the shared subtree     | `shared`          |
//!
//! Anything else is unassigned. Small third-party packages are deliberately
//! folded into `vendor` together with the framework: splitting them produces
//! many tiny chunks and can instantiate the framework more than once.

mod module_id;
mod rules;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use module_id::ParsedModuleId;
pub use rules::{Matcher, PackageSet, Rule, Subtree};

/// Named output bundle a module can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleName {
    Vendor,
    ChartsVendor,
    CalendarVendor,
    DashboardApp,
    LiffApp,
    Shared,
}

impl BundleName {
    pub const ALL: [BundleName; 6] = [
        BundleName::Vendor,
        BundleName::ChartsVendor,
        BundleName::CalendarVendor,
        BundleName::DashboardApp,
        BundleName::LiffApp,
        BundleName::Shared,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BundleName::Vendor => "vendor",
            BundleName::ChartsVendor => "charts-vendor",
            BundleName::CalendarVendor => "calendar-vendor",
            BundleName::DashboardApp => "dashboard-app",
            BundleName::LiffApp => "liff-app",
            BundleName::Shared => "shared",
        }
    }
}

impl std::fmt::Display for BundleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BundleName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BundleName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown bundle name: {}", s))
    }
}

/// Inputs for building a [`Classifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Directory names that mark a third-party dependency root.
    pub vendor_roots: Vec<String>,
    /// The framework and its routing, server-state and form add-ons.
    pub core_framework: Vec<String>,
    /// Large charting libraries, split into `charts-vendor`.
    pub charting: Vec<String>,
    /// Large calendar libraries, split into `calendar-vendor`.
    pub calendar: Vec<String>,
    pub dashboard_dir: String,
    pub liff_dir: String,
    pub shared_dir: String,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            vendor_roots: vec!["node_modules".to_string()],
            core_framework: [
                "react",
                "react-dom",
                "react-router",
                "react-router-dom",
                "@tanstack/react-query",
                "react-hook-form",
                "scheduler",
            ]
            .map(String::from)
            .to_vec(),
            charting: ["recharts", "recharts-*", "d3", "d3-*", "victory-vendor"]
                .map(String::from)
                .to_vec(),
            calendar: vec!["@fullcalendar/*".to_string()],
            dashboard_dir: "src/apps/dashboard".to_string(),
            liff_dir: "src/apps/liff".to_string(),
            shared_dir: "src/shared".to_string(),
        }
    }
}

/// Assigns modules to named bundles using an ordered rule table.
#[derive(Debug, Clone)]
pub struct Classifier {
    vendor_roots: Vec<String>,
    rules: Vec<Rule>,
}

impl Classifier {
    /// Build the rule table from options.
    ///
    /// # Errors
    ///
    /// Returns an error if a package pattern or subtree path is malformed.
    pub fn new(options: &ClassifierOptions) -> Result<Self> {
        let rules = vec![
            Rule::new(
                "core-framework",
                Matcher::PackageIn(PackageSet::new(options.core_framework.iter().cloned())?),
                BundleName::Vendor,
            ),
            Rule::new(
                "charting-library",
                Matcher::PackageIn(PackageSet::new(options.charting.iter().cloned())?),
                BundleName::ChartsVendor,
            ),
            Rule::new(
                "calendar-library",
                Matcher::PackageIn(PackageSet::new(options.calendar.iter().cloned())?),
                BundleName::CalendarVendor,
            ),
            Rule::new("third-party", Matcher::ThirdParty, BundleName::Vendor),
            Rule::new(
                "dashboard-app",
                Matcher::Under(Subtree::new(&options.dashboard_dir)?),
                BundleName::DashboardApp,
            ),
            Rule::new(
                "liff-app",
                Matcher::Under(Subtree::new(&options.liff_dir)?),
                BundleName::LiffApp,
            ),
            Rule::new(
                "shared",
                Matcher::Under(Subtree::new(&options.shared_dir)?),
                BundleName::Shared,
            ),
        ];

        let vendor_roots = options
            .vendor_roots
            .iter()
            .map(|root| root.trim_matches(['/', '\\']).to_string())
            .filter(|root| !root.is_empty())
            .collect();

        Ok(Self {
            vendor_roots,
            rules,
        })
    }

    /// Bundle for `module_id`, or `None` to leave it to the bundler's default grouping.
    pub fn classify(&self, module_id: &str) -> Option<BundleName> {
        self.explain(module_id).map(Rule::bundle)
    }

    /// The rule that decides `module_id`, if any.
    pub fn explain(&self, module_id: &str) -> Option<&Rule> {
        let module = ParsedModuleId::parse(module_id, &self.vendor_roots);
        let rule = self.rules.iter().find(|rule| rule.matcher().matches(&module));

        tracing::trace!(
            module = module_id,
            rule = ?rule.map(Rule::label),
            "classified module"
        );

        rule
    }

    /// Classify many modules in parallel. Results keep the input order.
    pub fn classify_all<S>(&self, module_ids: &[S]) -> Vec<Option<BundleName>>
    where
        S: AsRef<str> + Sync,
    {
        module_ids
            .par_iter()
            .map(|id| self.classify(id.as_ref()))
            .collect()
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&ClassifierOptions::default()).unwrap()
    }

    #[test]
    fn framework_packages_go_to_vendor() {
        let c = classifier();
        assert_eq!(c.classify("node_modules/react-dom/index.js"), Some(BundleName::Vendor));
        assert_eq!(
            c.classify("/app/node_modules/@tanstack/react-query/build/index.mjs"),
            Some(BundleName::Vendor)
        );
        assert_eq!(
            c.explain("node_modules/react/index.js").map(Rule::label),
            Some("core-framework")
        );
    }

    #[test]
    fn charting_beats_generic_vendor() {
        let c = classifier();
        assert_eq!(
            c.classify("node_modules/recharts/es6/index.js"),
            Some(BundleName::ChartsVendor)
        );
        assert_eq!(
            c.classify("node_modules/d3-shape/src/line.js"),
            Some(BundleName::ChartsVendor)
        );
    }

    #[test]
    fn calendar_scope_goes_to_calendar_vendor() {
        let c = classifier();
        assert_eq!(
            c.classify("node_modules/@fullcalendar/core/index.js"),
            Some(BundleName::CalendarVendor)
        );
        assert_eq!(
            c.classify("node_modules/@fullcalendar/react/dist/index.js"),
            Some(BundleName::CalendarVendor)
        );
    }

    #[test]
    fn other_third_party_falls_back_to_vendor() {
        let c = classifier();
        assert_eq!(c.classify("node_modules/dayjs/dayjs.min.js"), Some(BundleName::Vendor));
        assert_eq!(
            c.explain("node_modules/clsx/dist/clsx.mjs").map(Rule::label),
            Some("third-party")
        );
    }

    #[test]
    fn application_subtrees() {
        let c = classifier();
        assert_eq!(c.classify("src/apps/dashboard/Home.jsx"), Some(BundleName::DashboardApp));
        assert_eq!(
            c.classify("/repo/frontend/src/apps/liff/pages/Form.jsx"),
            Some(BundleName::LiffApp)
        );
        assert_eq!(c.classify("src/shared/hooks/useAuth.js"), Some(BundleName::Shared));
        assert_eq!(c.classify("src/main.jsx"), None);
        assert_eq!(c.classify("src/apps/admin/index.jsx"), None);
    }

    #[test]
    fn third_party_copies_of_app_paths_stay_vendor() {
        let c = classifier();
        assert_eq!(
            c.classify("node_modules/some-kit/src/shared/util.js"),
            Some(BundleName::Vendor)
        );
    }

    #[test]
    fn custom_vendor_roots() {
        let options = ClassifierOptions {
            vendor_roots: vec!["/web_modules/".to_string()],
            ..ClassifierOptions::default()
        };
        let c = Classifier::new(&options).unwrap();
        assert_eq!(c.classify("web_modules/react/index.js"), Some(BundleName::Vendor));
        assert_eq!(c.classify("node_modules/react/index.js"), None);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = ClassifierOptions {
            shared_dir: "/".to_string(),
            ..ClassifierOptions::default()
        };
        assert!(Classifier::new(&options).is_err());
    }

    #[test]
    fn classify_all_preserves_order() {
        let c = classifier();
        let ids = vec![
            "src/shared/a.js",
            "node_modules/recharts/index.js",
            "src/index.js",
            "node_modules/react/index.js",
        ];
        assert_eq!(
            c.classify_all(&ids),
            vec![
                Some(BundleName::Shared),
                Some(BundleName::ChartsVendor),
                None,
                Some(BundleName::Vendor),
            ]
        );
    }

    #[test]
    fn bundle_name_round_trips_through_str() {
        for name in BundleName::ALL {
            assert_eq!(name.as_str().parse::<BundleName>(), Ok(name));
        }
        assert!("vendors".parse::<BundleName>().is_err());
        assert_eq!(
            serde_json::to_string(&BundleName::ChartsVendor).unwrap(),
            "\"charts-vendor\""
        );
    }

    #[test]
    fn rule_table_order() {
        let labels: Vec<_> = classifier().rules().iter().map(Rule::label).collect();
        assert_eq!(
            labels,
            vec![
                "core-framework",
                "charting-library",
                "calendar-library",
                "third-party",
                "dashboard-app",
                "liff-app",
                "shared",
            ]
        );
    }
}
