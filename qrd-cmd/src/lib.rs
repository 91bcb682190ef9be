//! Command implementations for the quantum resource dashboard CLI.
//!
//! Each subcommand runs one of the dashboard's retrieval calls against the
//! project root and prints the result as JSON, which is what a rendering
//! front end consumes.

use std::io::Write;

use clap::Subcommand;
use indexmap::IndexMap;
use qrd_core::{LayerStyle, ProjectRoot};
use qrd_data::{Dashboard, Selection};

pub mod chart;
pub mod check;

#[derive(Subcommand)]
pub enum Command {
    /// Print the dashboard's text content and metric registry
    Text,

    /// List the selectable chart scales
    Scales,

    /// Aggregate the bar chart series for one scale
    Chart {
        /// Scale to aggregate (defaults to the first selectable scale)
        #[arg(short = 's', long)]
        scale: Option<String>,

        /// Only this metric (defaults to every registered metric)
        #[arg(short = 'm', long)]
        metric: Option<String>,

        /// Also write the rows to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },

    /// Resolve every map layer and print its points
    Layers,

    /// Print the resolved style of every registered layer
    Styles,

    /// Build a complete render pass for a selection
    Render {
        /// Scale to chart (defaults to the first selectable scale)
        #[arg(short = 's', long)]
        scale: Option<String>,

        /// Layer to draw; repeat for several (defaults to all)
        #[arg(short = 'l', long = "layer")]
        layers: Vec<String>,

        /// Write the render pass here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Validate the configuration and try every layer
    Check,
}

pub fn run(command: Command, root: ProjectRoot) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(command, root, &mut out)
}

/// Run `command` against the project at `root`, writing results to `out`.
pub fn execute(command: Command, root: ProjectRoot, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Check => check::run_check(&root, out),
        Command::Text => write_json(out, &Dashboard::load(root).display_text()),
        Command::Scales => write_json(out, &Dashboard::load(root).selectable_scales()),
        Command::Chart { scale, metric, csv } => {
            chart::run_chart(&Dashboard::load(root), scale, metric, csv.as_deref(), out)
        }
        Command::Layers => write_json(out, &Dashboard::load(root).map_layers()),
        Command::Styles => {
            let dashboard = Dashboard::load(root);
            let styles = dashboard.map_styles();
            let resolved: IndexMap<&str, LayerStyle> = dashboard
                .document()
                .gis_layers
                .iter()
                .map(|(name, _)| (name, styles.resolve(name)))
                .collect();
            write_json(out, &resolved)
        }
        Command::Render {
            scale,
            layers,
            output,
        } => {
            let selection = Selection {
                scale,
                layers: if layers.is_empty() { None } else { Some(layers) },
            };
            let pass = Dashboard::load(root).render_pass(&selection);
            match output {
                Some(path) => {
                    std::fs::write(&path, serde_json::to_string_pretty(&pass)?)?;
                    log::info!("[QRD] render: wrote render pass to {}", path);
                    Ok(())
                }
                None => write_json(out, &pass),
            }
        }
    }
}

pub(crate) fn write_json<T: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    pub(crate) fn fixtures() -> ProjectRoot {
        ProjectRoot::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures"))
    }

    fn run_json(command: Command, root: ProjectRoot) -> serde_json::Value {
        let mut out = Vec::new();
        execute(command, root, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn text_prints_content_and_registry() {
        let text = run_json(Command::Text, fixtures());
        assert_eq!(text["content"]["title"], "Quantum Resource Dashboard");
        assert_eq!(text["bar_chart_info"]["labels"]["physical_qubits"], "Physical qubits");
    }

    #[test]
    fn scales_are_sorted_lexically() {
        let scales = run_json(Command::Scales, fixtures());
        assert_eq!(scales, serde_json::json!(["large", "medium", "small"]));
    }

    #[test]
    fn layers_and_styles_come_from_fixture_files() {
        let layers = run_json(Command::Layers, fixtures());
        assert_eq!(layers["layers"]["Quantum hubs"].as_array().unwrap().len(), 3);
        assert!(layers["layers"].get("Data centers").is_none());
        assert_eq!(layers["warnings"][0]["layer"], "Data centers");

        let styles = run_json(Command::Styles, fixtures());
        assert_eq!(styles["Quantum hubs"]["color"], "purple");
        assert_eq!(styles["Data centers"]["color"], "blue");
        assert_eq!(styles["Data centers"]["size"], 10.0);
    }

    #[test]
    fn render_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("pass.json");
        let mut out = Vec::new();
        execute(
            Command::Render {
                scale: Some("small".into()),
                layers: vec!["Quantum hubs".into()],
                output: Some(path.to_string_lossy().into_owned()),
            },
            fixtures(),
            &mut out,
        )
        .unwrap();
        assert!(out.is_empty());

        let pass: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(pass["selected_scale"], "small");
        assert_eq!(pass["map"][0]["name"], "Quantum hubs");
        assert_eq!(pass["map"][0]["hover_text"][0], "Chicago Quantum Exchange");
    }

    #[test]
    fn missing_project_prints_empty_views() {
        let dir = tempfile::tempdir().unwrap();
        let text = run_json(Command::Text, ProjectRoot::new(dir.path()));
        assert_eq!(text["content"], serde_json::json!({}));
        let scales = run_json(Command::Scales, ProjectRoot::new(dir.path()));
        assert_eq!(scales, serde_json::json!([]));
    }
}
