//! Synthetic ownership graphs derived from a single asset record.
//!
//! Real ownership registries are not wired in, so the chain above the direct owner is a
//! fixed template whose length follows the requested depth.

use crate::graph::{AssetSummary, Graph, GraphEdge, GraphNode};
use estatevision_core::asset::NOT_AVAILABLE;
use estatevision_core::{AssetRecord, Depth, EdgeKind, NodeId, NodeKind, Ownership, OwnershipKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where the "UBO" edge of the company chain points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UboTarget {
    /// The Holding Company node.
    #[default]
    ParentNode,
    /// A freshly minted id no node carries. The edge dangles and is skipped by layout
    /// and rendering, which is how the first inspector release behaved.
    Detached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    pub ubo_target: UboTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Asset,
    Owner,
    Related,
    Parent,
    Ubo,
}

impl Role {
    fn prefix(self) -> &'static str {
        match self {
            Role::Asset => "asset",
            Role::Owner => "owner",
            Role::Related => "related",
            Role::Parent => "parent",
            Role::Ubo => "ubo",
        }
    }
}

/// Node ids reserved per role before any edge is created.
#[derive(Debug, Default)]
pub struct RoleIds {
    taken: HashSet<NodeId>,
    ids: HashMap<Role, NodeId>,
}

impl RoleIds {
    /// Reserve an id for `role`, preferring `preferred` and falling back to a
    /// role-derived id. Collisions are resolved with a numeric suffix.
    pub fn reserve(&mut self, role: Role, preferred: Option<&str>, asset_key: &str) -> NodeId {
        let candidate = match preferred {
            Some(id) => id.to_string(),
            None => format!("{}-{}", role.prefix(), asset_key),
        };
        let id = self.unique(candidate);
        self.ids.insert(role, id.clone());
        id
    }

    /// An id guaranteed not to belong to any reserved role.
    pub fn fresh(&mut self, role: Role, asset_key: &str) -> NodeId {
        self.unique(format!("{}-{}", role.prefix(), asset_key))
    }

    pub fn get(&self, role: Role) -> Option<&NodeId> {
        self.ids.get(&role)
    }

    fn unique(&mut self, candidate: String) -> NodeId {
        let mut id = NodeId::new(candidate.clone());
        let mut suffix = 2;
        while self.taken.contains(&id) {
            id = NodeId::new(format!("{candidate}-{suffix}"));
            suffix += 1;
        }
        self.taken.insert(id.clone());
        id
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    pub fn build(&self, record: &AssetRecord, depth: Depth) -> Graph {
        let mut graph = Graph::new();
        let mut ids = RoleIds::default();

        let asset_key = record.graph_id().to_string();
        let asset_id = ids.reserve(Role::Asset, Some(&asset_key), &asset_key);
        graph.add_node(
            GraphNode::new(
                asset_id.clone(),
                format!("Asset {}", record.parcel_label()),
                NodeKind::ASSET,
            )
            .with_asset(AssetSummary::from_record(record)),
        );

        match &record.ownership {
            None => self.unknown_chain(&mut graph, &mut ids, &asset_key, depth),
            Some(owner) => match owner.kind {
                OwnershipKind::Individual => {
                    self.individual_chain(&mut graph, &mut ids, owner, &asset_key, depth)
                }
                OwnershipKind::Company => {
                    self.company_chain(&mut graph, &mut ids, owner, &asset_key, depth)
                }
                OwnershipKind::Other => {
                    tracing::debug!(
                        "Asset {} has an unrecognized ownership type; showing the asset only",
                        asset_key
                    );
                }
            },
        }

        tracing::debug!(
            "Built ownership graph for {} at depth {}: {} nodes, {} edges",
            asset_key,
            depth,
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    fn unknown_chain(&self, graph: &mut Graph, ids: &mut RoleIds, asset_key: &str, depth: Depth) {
        let owner_id = ids.reserve(Role::Owner, None, asset_key);
        let related_id = ids.reserve(Role::Related, None, asset_key);
        let asset_id = asset_node_id(ids);

        graph.add_node(
            GraphNode::new(owner_id.clone(), "Unknown Owner", NodeKind::PERSON).with_share("100%"),
        );
        graph.add_edge(GraphEdge::new(
            owner_id.clone(),
            asset_id,
            "Ownership Unknown",
            EdgeKind::OWNS,
        ));

        if depth.reaches(2) {
            graph.add_node(
                GraphNode::new(related_id.clone(), "Related Entity (Unknown)", NodeKind::LEGAL)
                    .with_share("Unknown"),
            );
            graph.add_edge(GraphEdge::new(
                related_id,
                owner_id,
                "Related to",
                EdgeKind::CONTROLS,
            ));
        }
    }

    fn individual_chain(
        &self,
        graph: &mut Graph,
        ids: &mut RoleIds,
        owner: &Ownership,
        asset_key: &str,
        depth: Depth,
    ) {
        let owner_id = ids.reserve(Role::Owner, owner.ssn.as_deref(), asset_key);
        let trust_id = ids.reserve(Role::Related, None, asset_key);
        let asset_id = asset_node_id(ids);

        graph.add_node(
            GraphNode::new(
                owner_id.clone(),
                format!("{} {}", owner.name_or_na(), owner.surname_or_na()),
                NodeKind::PERSON,
            )
            .with_share("100%")
            .with_ssn(owner.ssn.clone()),
        );
        graph.add_edge(GraphEdge::new(
            owner_id.clone(),
            asset_id,
            "100% ownership",
            EdgeKind::OWNS,
        ));

        if depth.reaches(2) {
            graph.add_node(
                GraphNode::new(
                    trust_id.clone(),
                    format!("{} Family Trust", owner.surname_or_na()),
                    NodeKind::LEGAL,
                )
                .with_share("Beneficiary"),
            );
            graph.add_edge(GraphEdge::new(
                trust_id,
                owner_id,
                "Trust Beneficiary",
                EdgeKind::CONTROLS,
            ));
        }
    }

    fn company_chain(
        &self,
        graph: &mut Graph,
        ids: &mut RoleIds,
        owner: &Ownership,
        asset_key: &str,
        depth: Depth,
    ) {
        let company_fallback = format!("company-{asset_key}");
        let company_id = ids.reserve(
            Role::Owner,
            Some(owner.vat_number.as_deref().unwrap_or(&company_fallback)),
            asset_key,
        );
        let parent_id = ids.reserve(Role::Parent, None, asset_key);
        let ubo_id = ids.reserve(Role::Ubo, None, asset_key);
        let ubo_target = match self.options.ubo_target {
            UboTarget::ParentNode => parent_id.clone(),
            UboTarget::Detached => ids.fresh(Role::Parent, asset_key),
        };
        let asset_id = asset_node_id(ids);

        graph.add_node(
            GraphNode::new(
                company_id.clone(),
                owner
                    .vat_number
                    .clone()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                NodeKind::COMPANY,
            )
            .with_share("100%")
            .with_vat_number(owner.vat_number.clone()),
        );
        graph.add_edge(GraphEdge::new(
            company_id.clone(),
            asset_id,
            "100% ownership",
            EdgeKind::OWNS,
        ));

        if depth.reaches(2) {
            graph.add_node(
                GraphNode::new(parent_id.clone(), "Holding Company", NodeKind::COMPANY)
                    .with_share("Parent"),
            );
            graph.add_edge(GraphEdge::new(
                parent_id,
                company_id,
                "Parent Company",
                EdgeKind::OWNS,
            ));
        }

        if depth.reaches(3) {
            graph.add_node(
                GraphNode::new(ubo_id.clone(), "Ultimate Beneficial Owner", NodeKind::PERSON)
                    .with_share("UBO"),
            );
            graph.add_edge(GraphEdge::new(ubo_id, ubo_target, "UBO", EdgeKind::CONTROLS));
        }
    }
}

fn asset_node_id(ids: &RoleIds) -> NodeId {
    ids.get(Role::Asset)
        .cloned()
        .unwrap_or_else(|| NodeId::from("asset-1"))
}
