use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::KindArg;

/// Available chunkwise subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assign module ids to output bundles
    ///
    /// Prints one line per module: the id and its bundle, or "-" when the
    /// bundler's default grouping decides.
    Classify(ClassifyArgs),

    /// Compute the output path of a single emitted file
    Name(NameArgs),

    /// Classify and name a whole build described as JSON
    ///
    /// The description lists module ids and emitted files:
    ///
    ///   { "modules": ["node_modules/react/index.js", ...],
    ///     "files": [{ "kind": "chunk", "name": "vendor", "path": "out/vendor.js" }] }
    ///
    /// File paths are relative to the description. Inline "content" works too.
    Plan(PlanArgs),

    /// Start the development API proxy
    ///
    /// Requests whose path starts with a configured prefix (by default /api)
    /// are rewritten and forwarded to the upstream; everything else gets 404.
    Dev(DevArgs),

    /// Validate configuration and print a summary
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Module ids as the bundler reports them
    ///
    /// Examples:
    ///   chunkwise classify node_modules/react-dom/index.js
    ///   chunkwise classify src/apps/dashboard/Home.jsx src/main.jsx
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Also read module ids from stdin, one per line
    #[arg(long)]
    pub stdin: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Show the rule that decided each module
    #[arg(long)]
    pub explain: bool,
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// File whose content is hashed
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// What the bundler emits the file as
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// Logical name (chunk name or asset file name)
    ///
    /// Defaults to the file stem for entries and chunks and to the file name
    /// for assets.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Module id the chunk was created for
    ///
    /// Its stem fills the {sourceStem} placeholder of the chunk template.
    #[arg(long, value_name = "ID")]
    pub facade: Option<String>,

    /// Print JSON with the path, public URL and hash
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Build description (JSON)
    #[arg(value_name = "BUILD_JSON")]
    pub build: PathBuf,

    /// Write the plan here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DevArgs {
    /// Interface to listen on [default: 0.0.0.0]
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on [default: 3000, or $VITE_PORT]
    ///
    /// Use 0 to pick a free port.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Upstream for the /api rule [default: http://localhost:5000, or $VITE_API_BASE_URL]
    #[arg(long, value_name = "URL")]
    pub upstream: Option<String>,

    /// Open a browser once the server is listening
    #[arg(long, conflicts_with = "no_open")]
    pub open: bool,

    /// Do not open a browser
    #[arg(long)]
    pub no_open: bool,

    /// Skip certificate checks for every upstream
    ///
    /// Only honored in development mode.
    #[arg(long)]
    pub insecure_upstream: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub print: bool,
}
