//! Resource URI templates and static resource definitions.

use crate::types::{ResourceDefinition, ResourceTemplateDefinition};

pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    vec![
        ResourceTemplateDefinition::json(
            "cgraph://graph/{id}",
            "Full Graph",
            "Snapshot of an uploaded graph with every interaction",
        ),
        ResourceTemplateDefinition::json(
            "cgraph://graph/{id}/step/{step}",
            "Graph at Step",
            "Snapshot limited to interactions up to and including a step",
        ),
        ResourceTemplateDefinition::json(
            "cgraph://metrics/{id}",
            "Graph Metrics",
            "Density and degree centrality of the full graph",
        ),
    ]
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![
        ResourceDefinition::json(
            "cgraph://sessions",
            "Graph Sessions",
            "Uploaded graphs that have not expired",
        ),
        ResourceDefinition::json(
            "cgraph://frameworks",
            "Supported Frameworks",
            "Log formats accepted by graph_upload",
        ),
    ]
}
