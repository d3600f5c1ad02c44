//! `chunkwise classify`: bundle assignment of module ids.

use std::io::BufRead;

use chunkwise_core::{BundleName, Classifier};
use serde::Serialize;

use crate::cli::{ClassifyArgs, GlobalOptions};
use crate::commands::utils;
use crate::error::{InputError, Result};

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Classification<'a> {
    id: &'a str,
    bundle: Option<BundleName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'static str>,
}

pub fn execute(args: ClassifyArgs, global: &GlobalOptions) -> Result<()> {
    let project = utils::load_project(global, utils::PRODUCTION_MODE)?;
    let classifier = project.config.partition.classifier()?;

    let mut ids = args.ids;
    if args.stdin {
        ids.extend(read_ids(std::io::stdin().lock())?);
    }
    if ids.is_empty() {
        return Err(InputError::NoModuleIds.into());
    }

    let results = classify(&classifier, &ids, args.explain);
    tracing::debug!(modules = results.len(), "classified modules");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for line in results.iter().map(render_line) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Non-empty, trimmed lines.
fn read_ids(reader: impl BufRead) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

fn classify<'a>(classifier: &Classifier, ids: &'a [String], explain: bool) -> Vec<Classification<'a>> {
    if explain {
        ids.iter()
            .map(|id| {
                let rule = classifier.explain(id);
                Classification {
                    id,
                    bundle: rule.map(|rule| rule.bundle()),
                    rule: rule.map(|rule| rule.label()),
                }
            })
            .collect()
    } else {
        ids.iter()
            .zip(classifier.classify_all(ids))
            .map(|(id, bundle)| Classification {
                id,
                bundle,
                rule: None,
            })
            .collect()
    }
}

fn render_line(result: &Classification<'_>) -> String {
    let bundle = result.bundle.map_or("-", BundleName::as_str);
    match result.rule {
        Some(rule) => format!("{}\t{bundle}\t({rule})", result.id),
        None => format!("{}\t{bundle}", result.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunkwise_core::ClassifierOptions;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn reads_ids_from_lines() {
        let input = "node_modules/react/index.js\n\n  src/main.jsx  \n";
        assert_eq!(
            read_ids(input.as_bytes()).unwrap(),
            ids(&["node_modules/react/index.js", "src/main.jsx"])
        );
    }

    #[test]
    fn renders_text_lines() {
        let classifier = Classifier::new(&ClassifierOptions::default()).unwrap();
        let input = ids(&["node_modules/@fullcalendar/core/index.js", "src/main.jsx"]);
        let lines: Vec<_> = classify(&classifier, &input, false)
            .iter()
            .map(render_line)
            .collect();
        assert_eq!(
            lines,
            vec![
                "node_modules/@fullcalendar/core/index.js\tcalendar-vendor".to_string(),
                "src/main.jsx\t-".to_string(),
            ]
        );
    }

    #[test]
    fn explain_matches_classify() {
        let classifier = Classifier::new(&ClassifierOptions::default()).unwrap();
        let input = ids(&[
            "node_modules/react-dom/index.js",
            "node_modules/recharts/lib/index.js",
            "src/apps/liff/App.jsx",
            "src/main.jsx",
        ]);
        let plain = classify(&classifier, &input, false);
        let explained = classify(&classifier, &input, true);
        for (a, b) in plain.iter().zip(&explained) {
            assert_eq!(a.bundle, b.bundle);
            assert_eq!(b.rule.is_some(), b.bundle.is_some());
        }
    }

    #[test]
    fn json_omits_rule_unless_explaining() {
        let result = Classification {
            id: "src/shared/api.js",
            bundle: Some(BundleName::Shared),
            rule: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "src/shared/api.js", "bundle": "shared" })
        );
    }
}
