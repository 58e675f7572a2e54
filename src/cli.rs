use crate::config::load_config;
use crate::dump::write_flow_dump;
use crate::graph::build_flow_graph;
use crate::layout::LayoutEngine;
use crate::survey::Survey;
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "surveyflow",
    version,
    about = "Render-ready flow layout for branching surveys"
)]
pub struct Args {
    /// Input survey file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the positioned graph JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config JSON file overriding the built-in geometry constants
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Emit the unpositioned graph without running layout
    #[arg(long = "no-layout")]
    pub no_layout: bool,
}

pub async fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let survey = parse_survey(&input)?;
    let graph = build_flow_graph(&survey);

    let engine = LayoutEngine::with_default_solver(config);
    let positioned = if args.no_layout {
        let zeroed: Vec<crate::graph::FlowNode> = graph.nodes.clone();
        zeroed
            .into_iter()
            .map(|node| crate::layout::PositionedNode {
                position: crate::layout::ORIGIN,
                dimensions: engine.dimensions(&node),
                node,
            })
            .collect()
    } else {
        engine.layout(&graph.nodes, &graph.edges).await
    };

    write_flow_dump(args.output.as_deref(), &positioned, &graph.edges)?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Strict JSON first, then JSON5 for hand-written survey files with
/// comments or trailing commas.
fn parse_survey(input: &str) -> Result<Survey> {
    match serde_json::from_str(input) {
        Ok(survey) => Ok(survey),
        Err(json_err) => json5::from_str(input)
            .map_err(|_| anyhow::anyhow!("survey input is not valid JSON: {json_err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json5_survey_files() {
        let input = r#"{
            // editor scratch file
            questions: [
                { prompt: "Rate us", type: "rating", scale: 5 },
            ],
        }"#;
        let survey = parse_survey(input).expect("json5 survey should parse");
        assert_eq!(survey.len(), 1);
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(parse_survey("not a survey").is_err());
    }
}
