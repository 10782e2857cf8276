//! Append-only network accumulator and its HTML serialization

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;

use crate::error::{OutputError, RenderError, VizError};

/// Page-level rendering options
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkOptions {
    pub title: String,
    pub height: String,
    pub width: String,
    pub background_color: String,
    pub font_color: String,
    pub vis_cdn_url: String,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            title: "Botnet k-core graph".to_string(),
            height: "750px".to_string(),
            width: "100%".to_string(),
            background_color: "#222222".to_string(),
            font_color: "white".to_string(),
            vis_cdn_url: "https://unpkg.com/vis-network@9.1.2/standalone/umd/vis-network.min.js"
                .to_string(),
        }
    }
}

/// A node as the page sees it; `title` is the hover tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VizNode {
    pub id: i64,
    pub label: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct VizEdge {
    #[serde(rename = "from")]
    source: i64,
    #[serde(rename = "to")]
    target: i64,
}

/// What was written by [`Network::write_html`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub node_count: usize,
    pub edge_count: usize,
    pub bytes: usize,
}

/// Interactive graph view built by appending nodes and edges, then
/// serialized once. `render` and `write_html` consume the network.
#[derive(Debug, Clone)]
pub struct Network {
    options: NetworkOptions,
    nodes: Vec<VizNode>,
    node_ids: HashSet<i64>,
    edges: Vec<VizEdge>,
    edge_keys: HashSet<(i64, i64)>,
}

impl Network {
    pub fn new(options: NetworkOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            node_ids: HashSet::new(),
            edges: Vec::new(),
            edge_keys: HashSet::new(),
        }
    }

    /// Add a node. A repeated id is ignored and returns `false`.
    pub fn add_node(&mut self, node: VizNode) -> bool {
        if !self.node_ids.insert(node.id) {
            log::debug!("Ignoring duplicate node id {}", node.id);
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Add an undirected edge. A repeated pair, in either direction, is
    /// ignored and returns `false`. Endpoints are checked at render time.
    pub fn add_edge(&mut self, source: i64, target: i64) -> bool {
        let key = (source.min(target), source.max(target));
        if !self.edge_keys.insert(key) {
            log::debug!("Ignoring duplicate edge {} - {}", source, target);
            return false;
        }
        self.edges.push(VizEdge { source, target });
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Serialize to a complete HTML document.
    pub fn render(self) -> Result<String, RenderError> {
        let dangling = self
            .edges
            .iter()
            .filter(|e| !self.node_ids.contains(&e.source) || !self.node_ids.contains(&e.target))
            .count();
        if dangling > 0 {
            return Err(RenderError::DanglingEdges {
                count: dangling,
                total: self.edges.len(),
            });
        }

        let nodes = script_json(&serde_json::to_string(&self.nodes)?);
        let edges = script_json(&serde_json::to_string(&self.edges)?);
        let options = script_json(&serde_json::to_string(&self.vis_options())?);

        let mut page = String::new();
        write_page(&mut page, &self.options, &nodes, &edges, &options)?;

        Ok(page)
    }

    /// Render and write the page. The document is written to a temporary
    /// sibling and renamed into place, so a failed run leaves no partial file.
    pub fn write_html(self, path: &Path) -> Result<RenderSummary, VizError> {
        let node_count = self.nodes.len();
        let edge_count = self.edges.len();
        let html = self.render()?;

        let write_error = |source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, html.as_bytes()).map_err(write_error)?;
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_error(source).into());
        }

        log::info!(
            "Wrote {} ({} nodes, {} edges, {} bytes)",
            path.display(),
            node_count,
            edge_count,
            html.len()
        );

        Ok(RenderSummary {
            path: path.to_path_buf(),
            node_count,
            edge_count,
            bytes: html.len(),
        })
    }

    fn vis_options(&self) -> serde_json::Value {
        json!({
            "nodes": {
                "shape": "dot",
                "font": { "color": self.options.font_color }
            },
            "edges": {
                "color": { "inherit": true },
                "smooth": { "enabled": true, "type": "dynamic" }
            },
            "interaction": {
                "hover": true,
                "tooltipDelay": 200
            },
            "physics": {
                "enabled": true,
                "solver": "barnesHut",
                "stabilization": { "enabled": true, "iterations": 1000 }
            }
        })
    }
}

fn write_page(
    page: &mut String,
    opts: &NetworkOptions,
    nodes: &str,
    edges: &str,
    options: &str,
) -> std::fmt::Result {
    writeln!(page, "<!DOCTYPE html>")?;
    writeln!(page, "<html lang=\"en\">")?;
    writeln!(page, "<head>")?;
    writeln!(page, "  <meta charset=\"utf-8\">")?;
    writeln!(page, "  <title>{}</title>", escape_html(&opts.title))?;
    writeln!(page, "  <script src=\"{}\"></script>", escape_html(&opts.vis_cdn_url))?;
    writeln!(page, "  <style>")?;
    writeln!(
        page,
        "    body {{ margin: 0; background-color: {}; }}",
        escape_html(&opts.background_color)
    )?;
    writeln!(
        page,
        "    #network {{ width: {}; height: {}; background-color: {}; position: relative; float: left; }}",
        escape_html(&opts.width),
        escape_html(&opts.height),
        escape_html(&opts.background_color)
    )?;
    writeln!(page, "  </style>")?;
    writeln!(page, "</head>")?;
    writeln!(page, "<body>")?;
    writeln!(page, "  <div id=\"network\"></div>")?;
    writeln!(page, "  <script>")?;
    writeln!(page, "    var nodes = new vis.DataSet({});", nodes)?;
    writeln!(page, "    var edges = new vis.DataSet({});", edges)?;
    writeln!(page, "    var container = document.getElementById(\"network\");")?;
    writeln!(page, "    var options = {};", options)?;
    writeln!(
        page,
        "    var network = new vis.Network(container, {{ nodes: nodes, edges: edges }}, options);"
    )?;
    writeln!(page, "  </script>")?;
    writeln!(page, "</body>")?;
    writeln!(page, "</html>")
}

/// Keep inline JSON from closing the surrounding script element
fn script_json(raw: &str) -> String {
    raw.replace("</", "<\\/")
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
