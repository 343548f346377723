//! Graph source selection: external service first, local rows as fallback.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::graph::local::{build_local_graph, LocalProfile};
use crate::graph::types::{Graph, NodeType};
use crate::graph::zep::{classify_node, to_graph, ExternalGraph, GraphProvider};

/// Requested source. `Auto` behaves like `Zep` and is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphSource {
    Zep,
    Local,
    #[default]
    Auto,
}

impl GraphSource {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("auto") => Ok(GraphSource::Auto),
            Some("zep") => Ok(GraphSource::Zep),
            Some("local") => Ok(GraphSource::Local),
            Some(other) => Err(AppError::Validation(format!(
                "Invalid source '{other}'. Expected zep, local or auto"
            ))),
        }
    }
}

/// Where the returned graph actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedSource {
    Zep,
    Local,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub skill_count: usize,
    pub company_count: usize,
    pub preference_count: usize,
    pub matched_job_count: usize,
}

impl GraphStats {
    /// Counts by node type over a locally built graph, center included.
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            skill_count: graph.count(NodeType::Skill),
            company_count: graph.count(NodeType::Company),
            preference_count: graph.count(NodeType::Preference),
            matched_job_count: graph.count(NodeType::Job),
        }
    }

    /// Counts what the service returned, before the user center is added and
    /// dangling edges are dropped.
    pub fn from_external(external: &ExternalGraph) -> Self {
        let count = |node_type: NodeType| {
            external
                .nodes
                .iter()
                .filter(|n| classify_node(n) == node_type)
                .count()
        };
        Self {
            node_count: external.nodes.len(),
            edge_count: external.edges.len(),
            skill_count: count(NodeType::Skill),
            company_count: count(NodeType::Company),
            preference_count: count(NodeType::Preference),
            matched_job_count: count(NodeType::Job),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledGraph {
    pub graph: Graph,
    pub source: ResolvedSource,
    pub stats: GraphStats,
}

impl AssembledGraph {
    fn from_external(user_id: &str, external: ExternalGraph) -> Self {
        let stats = GraphStats::from_external(&external);
        Self {
            graph: to_graph(user_id, external),
            source: ResolvedSource::Zep,
            stats,
        }
    }

    fn from_local(graph: Graph) -> Self {
        let stats = GraphStats::from_graph(&graph);
        Self {
            graph,
            source: ResolvedSource::Local,
            stats,
        }
    }
}

/// Builds the user graph. External failures and empty results downgrade to
/// the local fallback; errors from `load_local` propagate.
pub async fn assemble_user_graph<F, Fut>(
    user_id: &str,
    requested: GraphSource,
    provider: &dyn GraphProvider,
    load_local: F,
) -> Result<AssembledGraph, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<LocalProfile, AppError>>,
{
    if requested != GraphSource::Local {
        match provider.fetch_user_graph(user_id).await {
            Ok(external) if !external.is_empty() => {
                info!(
                    "Serving Zep graph for user {user_id} ({} nodes, {} edges)",
                    external.nodes.len(),
                    external.edges.len()
                );
                return Ok(AssembledGraph::from_external(user_id, external));
            }
            Ok(_) => info!("Zep graph empty for user {user_id}, using local fallback"),
            Err(e) => warn!("Zep graph fetch failed for user {user_id}, using local fallback: {e}"),
        }
    }

    let profile = load_local().await?;
    Ok(AssembledGraph::from_local(build_local_graph(
        user_id, &profile,
    )))
}
