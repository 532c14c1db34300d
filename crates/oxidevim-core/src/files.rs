//! The project's files and the links between them.
//!
//! ## Learning: Data Contracts
//!
//! The graph view consumes `GraphData` read-only and reports clicks by
//! file id. The editor only ever needs two things from this module: the
//! content of a file, and a way to write a new content back. Ids are
//! opaque strings; nothing parses them.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file in the project graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// File text
    pub content: String,
    /// Colouring group
    pub group: u32,
}

/// A directed, weighted edge between two files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub value: u32,
}

/// Nodes and links of the project graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<FileNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl GraphData {
    /// Parses and validates a project from JSON.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Loads and validates a project from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Checks that ids are unique and that every link names known files.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateId(node.id.clone()));
            }
        }

        for link in &self.links {
            for end in [&link.source, &link.target] {
                if !seen.contains(end.as_str()) {
                    return Err(GraphError::DanglingLink(end.clone()));
                }
            }
        }
        Ok(())
    }

    /// The built-in demo project.
    pub fn sample() -> Self {
        let node = |id: &str, group: u32, content: &str| FileNode {
            id: id.to_string(),
            name: id.to_string(),
            content: content.to_string(),
            group,
        };
        let link = |source: &str, target: &str, value: u32| GraphLink {
            source: source.to_string(),
            target: target.to_string(),
            value,
        };

        Self {
            nodes: vec![
                node("README.md", 3, SAMPLE_README),
                node("main.rs", 1, SAMPLE_MAIN),
                node("lib.rs", 2, SAMPLE_LIB),
                node("utils.rs", 2, SAMPLE_UTILS),
                node("Cargo.toml", 3, SAMPLE_CARGO),
                node("types.rs", 1, SAMPLE_TYPES),
            ],
            links: vec![
                link("README.md", "main.rs", 1),
                link("main.rs", "lib.rs", 1),
                link("main.rs", "Cargo.toml", 1),
                link("lib.rs", "utils.rs", 2),
                link("lib.rs", "types.rs", 2),
            ],
        }
    }
}

/// Owns the project's files; the editor reads from and writes back to it.
#[derive(Debug, Clone)]
pub struct FileCollection {
    data: GraphData,
}

impl FileCollection {
    /// Wraps validated graph data.
    pub fn new(data: GraphData) -> Result<Self, GraphError> {
        data.validate()?;
        Ok(Self { data })
    }

    /// Returns a file by id.
    pub fn node(&self, id: &str) -> Option<&FileNode> {
        self.data.nodes.iter().find(|n| n.id == id)
    }

    /// Returns the text of a file.
    pub fn content(&self, id: &str) -> Option<&str> {
        self.node(id).map(|n| n.content.as_str())
    }

    /// Replaces the text of a file. Returns false for an unknown id.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.data.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Returns true if a file with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Id of the first file, used when nothing else is selected.
    pub fn first_id(&self) -> &str {
        // validate() guarantees at least one node
        self.data.nodes.first().map_or("", |n| n.id.as_str())
    }

    /// Iterates over file ids in project order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.data.nodes.iter().map(|n| n.id.as_str())
    }

    /// Returns all links.
    pub fn links(&self) -> &[GraphLink] {
        &self.data.links
    }

    /// Ids linked to or from a file, in link order, without repeats.
    pub fn neighbours(&self, id: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for link in &self.data.links {
            let other = if link.source == id {
                &link.target
            } else if link.target == id {
                &link.source
            } else {
                continue;
            };
            if !out.contains(&other.as_str()) {
                out.push(other);
            }
        }
        out
    }

    /// Returns the underlying graph data.
    pub fn graph(&self) -> &GraphData {
        &self.data
    }
}

/// Errors raised while loading a project.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Project has no files")]
    Empty,

    #[error("Duplicate file id: {0}")]
    DuplicateId(String),

    #[error("Link refers to unknown file: {0}")]
    DanglingLink(String),

    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const SAMPLE_README: &str = r#"# OxideVim

OxideVim is a conceptual Rust development environment that merges the modal editing efficiency of Vim with a spatial, node-based file system.

## Features

- **Modal Editing**: Full Vim emulation (Normal, Insert, Visual, Command modes).
- **Spatial Navigation**: Press 'TAB' to toggle the dependency graph.
- **Rust Toolchain Simulation**:
    - ':cargo run' - Run the current project
    - ':cargo build' - Compile dependencies
    - ':cargo check' - Fast syntax checking
- **Syntax Highlighting**: Native Rust syntax highlighting.

## Getting Started

1. Navigate files using the Graph View (TAB).
2. Edit code in standard Vim modes.
3. Use ':w' to save buffers (simulated).
"#;

const SAMPLE_MAIN: &str = r#"fn main() {
    println!("Welcome to OxideVim!");
    
    let config = Config::new();
    println!("Mode: {:?}", config.mode);

    // Try typing ':cargo run' in command mode!
    // Or press 'TAB' to see the dependency graph.
}"#;

const SAMPLE_LIB: &str = r#"pub struct Config {
    pub mode: String,
    pub version: u32,
}

impl Config {
    pub fn new() -> Self {
        Config {
            mode: String::from("Vim"),
            version: 1,
        }
    }
}

pub fn calculate_graph() {
    // TODO: Implement force-directed layout
}"#;

const SAMPLE_UTILS: &str = r#"pub mod graph {
    pub fn connect_nodes(a: &str, b: &str) {
        println!("Connecting {} to {}", a, b);
    }
}

pub mod editor {
    pub fn insert_char(c: char) {
        // Handle insert mode
    }
}"#;

const SAMPLE_CARGO: &str = r#"[package]
name = "oxide_vim"
version = "0.1.0"
edition = "2021"

[dependencies]
tokio = { version = "1.0", features = ["full"] }
serde = { version = "1.0", features = ["derive"] }"#;

const SAMPLE_TYPES: &str = r#"#[derive(Debug)]
pub enum EditorMode {
    Normal,
    Insert,
    Visual,
    Command,
}

pub struct Node {
    pub id: String,
    pub val: i32,
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let sample = GraphData::sample();
        sample.validate().unwrap();
        assert_eq!(sample.nodes.len(), 6);
        assert_eq!(sample.links.len(), 5);
        assert_eq!(sample.nodes[0].id, "README.md");
    }

    #[test]
    fn test_set_content() {
        let mut files = FileCollection::new(GraphData::sample()).unwrap();
        assert!(files.set_content("lib.rs", "pub fn f() {}"));
        assert_eq!(files.content("lib.rs"), Some("pub fn f() {}"));
        assert!(!files.set_content("missing.rs", "x"));
    }

    #[test]
    fn test_neighbours() {
        let files = FileCollection::new(GraphData::sample()).unwrap();
        assert_eq!(
            files.neighbours("main.rs"),
            vec!["README.md", "lib.rs", "Cargo.toml"]
        );
        assert_eq!(files.neighbours("types.rs"), vec!["lib.rs"]);
    }

    #[test]
    fn test_from_json() {
        let data = GraphData::from_json(
            r#"{
                "nodes": [
                    {"id": "a.rs", "name": "a", "content": "", "group": 1},
                    {"id": "b.rs", "name": "b", "content": "fn b() {}", "group": 2}
                ],
                "links": [{"source": "a.rs", "target": "b.rs", "value": 1}]
            }"#,
        )
        .unwrap();
        assert_eq!(data.nodes[1].content, "fn b() {}");
    }

    #[test]
    fn test_links_are_optional() {
        let data = GraphData::from_json(
            r#"{"nodes": [{"id": "a", "name": "a", "content": "", "group": 0}]}"#,
        )
        .unwrap();
        assert!(data.links.is_empty());
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            GraphData::from_json(r#"{"nodes": []}"#),
            Err(GraphError::Empty)
        ));

        let dup = r#"{"nodes": [
            {"id": "a", "name": "a", "content": "", "group": 0},
            {"id": "a", "name": "a", "content": "", "group": 0}
        ]}"#;
        assert!(matches!(
            GraphData::from_json(dup),
            Err(GraphError::DuplicateId(id)) if id == "a"
        ));

        let dangling = r#"{
            "nodes": [{"id": "a", "name": "a", "content": "", "group": 0}],
            "links": [{"source": "a", "target": "z", "value": 1}]
        }"#;
        assert!(matches!(
            GraphData::from_json(dangling),
            Err(GraphError::DanglingLink(id)) if id == "z"
        ));

        assert!(matches!(
            GraphData::from_json("not json"),
            Err(GraphError::Json(_))
        ));
    }
}
