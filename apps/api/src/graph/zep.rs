//! Zep graph client for the external knowledge-graph service.
//!
//! `AppState` holds an `Arc<dyn GraphProvider>`. A missing API key yields
//! `ZepError::NotConfigured`, which callers treat like any other upstream
//! failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::graph::types::{Graph, GraphEdge, GraphNode, NodeType};

/// Page size for node and edge listing.
const LIST_LIMIT: u32 = 200;

#[derive(Debug, Error)]
pub enum ZepError {
    #[error("Zep API key is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZepNode {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZepEdge {
    pub uuid: String,
    pub source_node_uuid: String,
    pub target_node_uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fact: Option<String>,
}

/// Raw nodes and edges for one user, as returned by the service.
#[derive(Debug, Clone, Default)]
pub struct ExternalGraph {
    pub nodes: Vec<ZepNode>,
    pub edges: Vec<ZepEdge>,
}

impl ExternalGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Data pushed into a user's external graph.
#[derive(Debug, Clone)]
pub enum GraphPayload {
    Text(String),
    Json(Value),
}

#[async_trait]
pub trait GraphProvider: Send + Sync {
    async fn fetch_user_graph(&self, user_id: &str) -> Result<ExternalGraph, ZepError>;

    async fn add_data(&self, user_id: &str, payload: GraphPayload) -> Result<(), ZepError>;

    /// False when calls are guaranteed to fail for lack of configuration.
    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct ZepClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct ListRequest {
    limit: u32,
}

#[derive(Serialize)]
struct AddDataRequest<'a> {
    user_id: &'a str,
    #[serde(rename = "type")]
    data_type: &'a str,
    data: String,
}

impl ZepClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn api_key(&self) -> Result<&str, ZepError> {
        self.api_key.as_deref().ok_or(ZepError::NotConfigured)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ZepError> {
        let api_key = self.api_key()?;
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Api-Key {api_key}"))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZepError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl GraphProvider for ZepClient {
    async fn fetch_user_graph(&self, user_id: &str) -> Result<ExternalGraph, ZepError> {
        let body = ListRequest { limit: LIST_LIMIT };
        let nodes_path = format!("/api/v2/graph/node/user/{user_id}");
        let edges_path = format!("/api/v2/graph/edge/user/{user_id}");

        let (nodes, edges) = tokio::try_join!(
            self.post::<_, Vec<ZepNode>>(&nodes_path, &body),
            self.post::<_, Vec<ZepEdge>>(&edges_path, &body),
        )?;

        debug!(
            "Zep returned {} nodes, {} edges for user {user_id}",
            nodes.len(),
            edges.len()
        );
        Ok(ExternalGraph { nodes, edges })
    }

    async fn add_data(&self, user_id: &str, payload: GraphPayload) -> Result<(), ZepError> {
        let (data_type, data) = match payload {
            GraphPayload::Text(text) => ("text", text),
            GraphPayload::Json(value) => ("json", value.to_string()),
        };
        let _: Value = self
            .post(
                "/api/v2/graph",
                &AddDataRequest {
                    user_id,
                    data_type,
                    data,
                },
            )
            .await?;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Maps Zep labels to a node type by case-insensitive substring match. Nodes
/// without labels are classified by name.
pub fn classify_node(node: &ZepNode) -> NodeType {
    let haystack: Vec<String> = if node.labels.is_empty() {
        vec![node.name.to_lowercase()]
    } else {
        node.labels.iter().map(|l| l.to_lowercase()).collect()
    };
    let has = |needle: &str| haystack.iter().any(|h| h.contains(needle));

    if has("skill") {
        NodeType::Skill
    } else if has("company") || has("organization") {
        NodeType::Company
    } else if has("preference") {
        NodeType::Preference
    } else if has("job") {
        NodeType::Job
    } else if has("user") {
        NodeType::User
    } else {
        NodeType::Fact
    }
}

/// Converts the service's nodes and edges into a `Graph` centered on the user.
/// Edges that point at unknown nodes are dropped to keep the graph consistent.
pub fn to_graph(user_id: &str, external: ExternalGraph) -> Graph {
    let existing_center = external
        .nodes
        .iter()
        .find(|n| classify_node(n) == NodeType::User)
        .map(|n| n.uuid.clone());

    let mut graph = match &existing_center {
        Some(_) => Graph {
            center: String::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        },
        None => Graph::new(GraphNode::new(format!("user-{user_id}"), NodeType::User, "You")),
    };

    for node in external.nodes {
        let node_type = classify_node(&node);
        let label = if node.name.is_empty() {
            node.uuid.clone()
        } else {
            node.name.clone()
        };
        let data = json!({ "labels": node.labels, "summary": node.summary });
        if graph
            .add_node(GraphNode::new(node.uuid, node_type, label).with_data(data))
            .is_err()
        {
            debug!("Skipping duplicate Zep node");
        }
    }
    if let Some(center) = existing_center {
        graph.center = center;
    }

    for edge in external.edges {
        let relation = if edge.name.is_empty() {
            "related_to".to_string()
        } else {
            edge.name.to_lowercase()
        };
        let result = graph.add_edge(GraphEdge {
            source: edge.source_node_uuid,
            target: edge.target_node_uuid,
            relation,
            weight: None,
            label: edge.fact,
        });
        if let Err(e) = result {
            debug!("Skipping Zep edge {}: {e}", edge.uuid);
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn node(uuid: &str, name: &str, labels: &[&str]) -> ZepNode {
        ZepNode {
            uuid: uuid.into(),
            name: name.into(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            summary: None,
        }
    }

    fn edge(uuid: &str, source: &str, target: &str) -> ZepEdge {
        ZepEdge {
            uuid: uuid.into(),
            source_node_uuid: source.into(),
            target_node_uuid: target.into(),
            name: "HAS_SKILL".into(),
            fact: Some("knows it".into()),
        }
    }

    #[test]
    fn test_classify_by_label_substring() {
        assert_eq!(classify_node(&node("1", "SQL", &["Entity", "TechnicalSkill"])), NodeType::Skill);
        assert_eq!(classify_node(&node("2", "Acme", &["Organization"])), NodeType::Company);
        assert_eq!(classify_node(&node("3", "x", &["WorkPreference"])), NodeType::Preference);
        assert_eq!(classify_node(&node("4", "x", &["JobPosting"])), NodeType::Job);
        assert_eq!(classify_node(&node("5", "x", &["Entity"])), NodeType::Fact);
    }

    #[test]
    fn test_classify_falls_back_to_name_without_labels() {
        assert_eq!(classify_node(&node("1", "Company: Acme", &[])), NodeType::Company);
    }

    #[test]
    fn test_to_graph_adds_center_and_drops_dangling_edges() {
        let external = ExternalGraph {
            nodes: vec![node("a", "SQL", &["Skill"]), node("b", "Acme", &["Company"])],
            edges: vec![edge("e1", "a", "b"), edge("e2", "a", "missing")],
        };
        let g = to_graph("u1", external);

        assert_eq!(g.center, "user-u1");
        assert_eq!(g.nodes.len(), 3);
        assert_eq!(g.edges.len(), 1);
        assert_eq!(g.edges[0].relation, "has_skill");
        assert_eq!(g.edges[0].label.as_deref(), Some("knows it"));
    }

    #[test]
    fn test_to_graph_reuses_existing_user_node() {
        let external = ExternalGraph {
            nodes: vec![node("me", "Jane", &["User"]), node("a", "SQL", &["Skill"])],
            edges: vec![edge("e1", "me", "a")],
        };
        let g = to_graph("u1", external);
        assert_eq!(g.center, "me");
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_user_graph_queries_nodes_and_edges() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/graph/node/user/u1"))
            .and(header("Authorization", "Api-Key zk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"uuid": "a", "name": "SQL", "labels": ["Skill"]}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/graph/edge/user/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let zep = ZepClient::new(Client::new(), Some("zk".into()), server.uri());
        let graph = zep.fetch_user_graph("u1").await.unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        assert!(!graph.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_fails_when_either_request_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/graph/node/user/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v2/graph/edge/user/u1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let zep = ZepClient::new(Client::new(), Some("zk".into()), server.uri());
        let err = zep.fetch_user_graph("u1").await.unwrap_err();
        assert!(matches!(err, ZepError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_add_data_sends_json_payload_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/graph"))
            .and(body_json(json!({
                "user_id": "u1",
                "type": "json",
                "data": "{\"skills\":[\"SQL\"]}"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "ep1"})))
            .expect(1)
            .mount(&server)
            .await;

        let zep = ZepClient::new(Client::new(), Some("zk".into()), server.uri());
        zep.add_data("u1", GraphPayload::Json(json!({"skills": ["SQL"]})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let zep = ZepClient::new(Client::new(), None, "http://127.0.0.1:9");
        assert!(!zep.is_enabled());
        assert!(matches!(
            zep.fetch_user_graph("u1").await,
            Err(ZepError::NotConfigured)
        ));
    }
}
