//! Single-job knowledge graph: a star around the job node.

use crate::graph::types::{Graph, GraphEdge, GraphNode, NodeType};

/// Lower-cases and replaces every run of non-alphanumerics with one hyphen.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn node_id(prefix: &str, label: &str, index: usize) -> String {
    format!("{prefix}-{}-{index}", slugify(label))
}

fn star_edge(center: &str, target: &str, relation: &str) -> GraphEdge {
    GraphEdge {
        source: center.to_string(),
        target: target.to_string(),
        relation: relation.to_string(),
        weight: None,
        label: Some(relation.to_string()),
    }
}

/// Returns `None` when there are no skills and no location: the view is
/// suppressed instead of showing a lone job node.
pub fn build_job_graph(
    title: &str,
    company: Option<&str>,
    skills: &[String],
    location: Option<&str>,
) -> Option<Graph> {
    let location = location.map(str::trim).filter(|l| !l.is_empty());
    if skills.is_empty() && location.is_none() {
        return None;
    }

    let job_id = node_id("job", title, 0);
    let mut graph = Graph::new(GraphNode::new(job_id.clone(), NodeType::Job, title));
    let link = |graph: &mut Graph, node: GraphNode, relation: &str| {
        let target = node.id.clone();
        // Ids carry a per-kind prefix and index, so neither call can fail.
        if graph.add_node(node).is_ok() {
            let _ = graph.add_edge(star_edge(&job_id, &target, relation));
        }
    };

    if let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) {
        link(
            &mut graph,
            GraphNode::new(node_id("company", company, 0), NodeType::Company, company),
            "posted by",
        );
    }
    for (i, skill) in skills.iter().enumerate() {
        link(
            &mut graph,
            GraphNode::new(node_id("skill", skill, i), NodeType::Skill, skill.as_str()),
            "requires",
        );
    }
    if let Some(location) = location {
        link(
            &mut graph,
            GraphNode::new(node_id("location", location, 0), NodeType::Fact, location),
            "location",
        );
    }

    Some(graph)
}
