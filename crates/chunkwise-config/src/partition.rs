//! `[partition]` section: how modules are split into named bundles.

use chunkwise_core::{Classifier, ClassifierOptions};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Directory names marking a third-party dependency root.
    pub vendor_roots: Vec<String>,
    /// Package patterns kept in `vendor` together with the framework.
    pub core_framework: Vec<String>,
    pub charting: Vec<String>,
    pub calendar: Vec<String>,
    pub dashboard_dir: String,
    pub liff_dir: String,
    pub shared_dir: String,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        ClassifierOptions::default().into()
    }
}

impl PartitionConfig {
    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            vendor_roots: self.vendor_roots.clone(),
            core_framework: self.core_framework.clone(),
            charting: self.charting.clone(),
            calendar: self.calendar.clone(),
            dashboard_dir: self.dashboard_dir.clone(),
            liff_dir: self.liff_dir.clone(),
            shared_dir: self.shared_dir.clone(),
        }
    }

    /// Build the classifier this section describes.
    pub fn classifier(&self) -> Result<Classifier> {
        if self.vendor_roots.iter().all(|root| root.trim_matches(['/', '\\']).is_empty()) {
            return Err(ConfigError::validation(
                "partition.vendor_roots",
                "at least one third-party root directory is required",
            ));
        }
        Classifier::new(&self.classifier_options())
            .map_err(|err| ConfigError::validation("partition", err))
    }
}

impl From<ClassifierOptions> for PartitionConfig {
    fn from(options: ClassifierOptions) -> Self {
        Self {
            vendor_roots: options.vendor_roots,
            core_framework: options.core_framework,
            charting: options.charting,
            calendar: options.calendar,
            dashboard_dir: options.dashboard_dir,
            liff_dir: options.liff_dir,
            shared_dir: options.shared_dir,
        }
    }
}
