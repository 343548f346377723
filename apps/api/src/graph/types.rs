use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    User,
    Skill,
    Job,
    Company,
    Preference,
    Fact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: label.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("edge {from} -> {to} references a missing node")]
    DanglingEdge { from: String, to: String },
}

/// Read-time projection of a user or job. Rebuilt on every request.
///
/// Invariants: node ids are unique, every edge endpoint is a node id, and the
/// center is one of the nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub center: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new(center: GraphNode) -> Self {
        Self {
            center: center.id.clone(),
            nodes: vec![center],
            edges: Vec::new(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn add_node(&mut self, node: GraphNode) -> Result<(), GraphError> {
        if self.contains(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        if !self.contains(&edge.source) || !self.contains(&edge.target) {
            return Err(GraphError::DanglingEdge {
                from: edge.source,
                to: edge.target,
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn count(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }
}
