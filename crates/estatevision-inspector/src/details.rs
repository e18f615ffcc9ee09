use estatevision_core::AssetRecord;
use estatevision_core::asset::NOT_AVAILABLE;
use estatevision_graph::{GraphNode, get_kind_label};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: String,
}

impl DetailRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Metadata panel for a selected node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDetails {
    pub title: String,
    pub rows: Vec<DetailRow>,
}

impl NodeDetails {
    pub fn for_node(node: &GraphNode) -> Self {
        let mut rows = vec![DetailRow::new("Type", get_kind_label(node.kind))];
        if let Some(ssn) = &node.ssn {
            rows.push(DetailRow::new("SSN (Codice Fiscale)", ssn.as_str()));
        }
        if let Some(vat) = &node.vat_number {
            rows.push(DetailRow::new("VAT (Partita IVA)", vat.as_str()));
        }
        if let Some(share) = &node.ownership_share {
            rows.push(DetailRow::new("Ownership", share.as_str()));
        }
        if let Some(asset) = &node.asset {
            rows.push(DetailRow::new(
                "Municipality",
                asset.municipality.as_deref().unwrap_or(NOT_AVAILABLE),
            ));
            rows.push(DetailRow::new(
                "Parcel",
                asset.parcel.as_deref().unwrap_or(NOT_AVAILABLE),
            ));
        }
        Self {
            title: node.label.clone(),
            rows,
        }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Sidebar block describing the inspected asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetHeader {
    pub title: String,
    pub id: String,
    pub location: String,
}

impl AssetHeader {
    pub fn from_record(record: &AssetRecord) -> Self {
        let name = record
            .particella
            .as_deref()
            .or(record.id.as_deref())
            .unwrap_or("Unknown");
        Self {
            title: format!("Asset: {name}"),
            id: format!("ID: {}", record.display_id()),
            location: format!("Location: {}", record.location()),
        }
    }
}
