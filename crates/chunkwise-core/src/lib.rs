//! Chunkwise core - the decision layer on top of a JavaScript bundler.
//!
//! Nothing in this crate compiles, resolves or tree-shakes modules. It answers
//! the questions a bundler asks while emitting output:
//!
//! - [`classify`] - which named output bundle a module belongs to
//! - [`assets`] - which output directory a static asset goes to
//! - [`naming`] - the content-hashed file name of every chunk and asset
//! - [`plan`] - all of the above for a whole build at once
//!
//! Every function here is pure and synchronous. A [`Classifier`] or a
//! [`ChunkNamer`] holds only immutable configuration and can be shared across
//! threads without locking.
//!
//! # Example
//!
//! ```
//! use chunkwise_core::{BundleName, Classifier, ClassifierOptions};
//!
//! let classifier = Classifier::new(&ClassifierOptions::default()).unwrap();
//!
//! assert_eq!(
//!     classifier.classify("node_modules/react-dom/index.js"),
//!     Some(BundleName::Vendor)
//! );
//! assert_eq!(
//!     classifier.classify("src/apps/dashboard/Home.jsx"),
//!     Some(BundleName::DashboardApp)
//! );
//! assert_eq!(classifier.classify("src/main.jsx"), None);
//! ```

pub mod assets;
pub mod classify;
pub mod error;
pub mod naming;
pub mod plan;

pub use assets::{AssetCategory, AssetRoute};
pub use classify::{BundleName, Classifier, ClassifierOptions, Rule};
pub use error::{Error, Result};
pub use naming::{
    ChunkNamer, ContentHash, EmittedFile, NamingOptions, OutputKind, OutputPathTemplate,
    TemplateKind,
};
pub use plan::{ModuleAssignment, OutputPlan, OutputPlanner, PlannedFile};
