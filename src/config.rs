use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed geometry constants for the flow layout. Node boxes are not
/// measured from content; the rendering surface draws into these sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub question_node_width: f32,
    pub question_node_height: f32,
    /// End node with thank-you preview content.
    pub end_node_width: f32,
    pub end_node_height: f32,
    /// Plain dashed terminator box.
    pub end_plain_width: f32,
    pub end_plain_height: f32,
    /// Space between left-to-right layers.
    pub rank_spacing: f32,
    /// Space between nodes within a layer.
    pub node_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    /// Per-character width heuristic for reserving edge label space.
    pub label_char_width: f32,
    pub label_padding: f32,
    pub label_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            question_node_width: 240.0,
            question_node_height: 120.0,
            end_node_width: 240.0,
            end_node_height: 160.0,
            end_plain_width: 120.0,
            end_plain_height: 48.0,
            rank_spacing: 80.0,
            node_spacing: 40.0,
            margin_x: 8.0,
            margin_y: 8.0,
            label_char_width: 7.2,
            label_padding: 16.0,
            label_height: 18.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    question_node_width: Option<f32>,
    question_node_height: Option<f32>,
    end_node_width: Option<f32>,
    end_node_height: Option<f32>,
    end_plain_width: Option<f32>,
    end_plain_height: Option<f32>,
    rank_spacing: Option<f32>,
    node_spacing: Option<f32>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
    label_char_width: Option<f32>,
    label_padding: Option<f32>,
    label_height: Option<f32>,
}

/// Load layout constants, with a JSON file overriding any subset of the
/// defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: LayoutConfigFile = serde_json::from_str(&contents)?;
    Ok(apply_overrides(LayoutConfig::default(), parsed))
}

fn apply_overrides(mut config: LayoutConfig, parsed: LayoutConfigFile) -> LayoutConfig {
    if let Some(v) = parsed.question_node_width {
        config.question_node_width = v;
    }
    if let Some(v) = parsed.question_node_height {
        config.question_node_height = v;
    }
    if let Some(v) = parsed.end_node_width {
        config.end_node_width = v;
    }
    if let Some(v) = parsed.end_node_height {
        config.end_node_height = v;
    }
    if let Some(v) = parsed.end_plain_width {
        config.end_plain_width = v;
    }
    if let Some(v) = parsed.end_plain_height {
        config.end_plain_height = v;
    }
    if let Some(v) = parsed.rank_spacing {
        config.rank_spacing = v;
    }
    if let Some(v) = parsed.node_spacing {
        config.node_spacing = v;
    }
    if let Some(v) = parsed.margin_x {
        config.margin_x = v;
    }
    if let Some(v) = parsed.margin_y {
        config.margin_y = v;
    }
    if let Some(v) = parsed.label_char_width {
        config.label_char_width = v;
    }
    if let Some(v) = parsed.label_padding {
        config.label_padding = v;
    }
    if let Some(v) = parsed.label_height {
        config.label_height = v;
    }
    config
}
