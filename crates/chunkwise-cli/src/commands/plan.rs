//! `chunkwise plan`: classify and name a whole build.

use std::path::{Path, PathBuf};

use chunkwise_core::{EmittedFile, OutputKind, OutputPlan, OutputPlanner};
use serde::Deserialize;

use crate::cli::{GlobalOptions, PlanArgs};
use crate::commands::utils;
use crate::error::{InputError, Result, ResultExt};
use crate::ui;

/// What a bundler integration knows after a build.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BuildDescription {
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub files: Vec<FileDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileDescription {
    pub kind: OutputKind,
    pub name: String,
    #[serde(default)]
    pub facade_module_id: Option<String>,
    /// Inline content.
    #[serde(default)]
    pub content: Option<String>,
    /// File to hash, relative to the description.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

pub fn execute(args: PlanArgs, global: &GlobalOptions) -> Result<()> {
    let project = utils::load_project(global, utils::PRODUCTION_MODE)?;
    let output = &project.config.output;

    let build_path = utils::resolve_path(&args.build, &project.root);
    let build = read_description(&build_path)?;
    let contents = load_contents(&build, build_path.parent().unwrap_or(Path::new(".")))?;

    let planner = OutputPlanner::new(project.config.partition.classifier()?, output.namer()?)
        .with_base(output.base.as_str());
    let plan = plan_build(&planner, &build, &contents);

    let sizes: Vec<u64> = contents.iter().map(|content| content.len() as u64).collect();
    let limit = output.chunk_size_warning_bytes();
    for (file, size) in plan.files.iter().zip(&sizes) {
        if file.kind != OutputKind::Asset && *size > limit {
            ui::warning(&format!(
                "{} is {} (limit {})",
                file.path,
                ui::format_size(*size),
                ui::format_size(limit)
            ));
        }
    }

    let json = serde_json::to_string_pretty(&plan)?;
    match &args.output {
        Some(out) => {
            let out = utils::resolve_path(out, &project.root);
            std::fs::write(&out, format!("{json}\n")).with_path(&out)?;
            ui::print_plan_summary(&plan, &sizes, limit);
            ui::success(&format!("Wrote plan to {}", out.display()));
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_description(path: &Path) -> Result<BuildDescription> {
    let raw = std::fs::read_to_string(path).with_path(path)?;
    serde_json::from_str(&raw).map_err(|err| {
        InputError::InvalidBuildDescription {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
        .into()
    })
}

/// Bytes of every file, in description order.
pub(crate) fn load_contents(build: &BuildDescription, dir: &Path) -> Result<Vec<Vec<u8>>> {
    build
        .files
        .iter()
        .map(|file| match (&file.content, &file.path) {
            (Some(content), _) => Ok(content.as_bytes().to_vec()),
            (None, Some(path)) => {
                let path = utils::resolve_path(path, dir);
                std::fs::read(&path).with_path(&path)
            }
            (None, None) => Err(InputError::MissingContent {
                name: file.name.clone(),
            }
            .into()),
        })
        .collect()
}

pub(crate) fn plan_build(
    planner: &OutputPlanner,
    build: &BuildDescription,
    contents: &[Vec<u8>],
) -> OutputPlan {
    let files = build
        .files
        .iter()
        .zip(contents)
        .map(|(file, content)| EmittedFile {
            kind: file.kind,
            name: &file.name,
            facade_module_id: file.facade_module_id.as_deref(),
            content,
        });
    planner.plan(&build.modules, files)
}
