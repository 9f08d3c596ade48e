//! Node and edge kind discriminators.
//!
//! Serialized type ids match the diagram client's element type ids, so the
//! same strings appear in the file format, the transport schema and the
//! property-graph `type` property.

use serde::{Deserialize, Serialize};

/// Coarse grouping of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFamily {
    Task,
    Category,
    Activity,
}

/// Closed set of node kinds known to the workflow diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "task")]
    Task,
    #[serde(rename = "task:manual")]
    ManualTask,
    #[serde(rename = "task:automated")]
    AutomatedTask,
    #[serde(rename = "task:manualCp")]
    ManualTaskCp,
    #[serde(rename = "task:automatedCp")]
    AutomatedTaskCp,
    #[serde(rename = "task:hybrid")]
    HybridTask,
    #[serde(rename = "task:autonomous")]
    AutonomousTask,
    #[serde(rename = "task:cognitive")]
    CognitiveTask,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "categoryCp")]
    CategoryCp,
    #[serde(rename = "activityNode:decision")]
    Decision,
    #[serde(rename = "activityNode:merge")]
    Merge,
    #[serde(rename = "activityNode:fork")]
    Fork,
    #[serde(rename = "activityNode:join")]
    Join,
    #[serde(rename = "activityNode:decisionCp")]
    DecisionCp,
    #[serde(rename = "activityNode:mergeCp")]
    MergeCp,
    #[serde(rename = "activityNode:forkCp")]
    ForkCp,
    #[serde(rename = "activityNode:joinCp")]
    JoinCp,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::Task,
        NodeKind::ManualTask,
        NodeKind::AutomatedTask,
        NodeKind::ManualTaskCp,
        NodeKind::AutomatedTaskCp,
        NodeKind::HybridTask,
        NodeKind::AutonomousTask,
        NodeKind::CognitiveTask,
        NodeKind::Category,
        NodeKind::CategoryCp,
        NodeKind::Decision,
        NodeKind::Merge,
        NodeKind::Fork,
        NodeKind::Join,
        NodeKind::DecisionCp,
        NodeKind::MergeCp,
        NodeKind::ForkCp,
        NodeKind::JoinCp,
    ];

    /// Returns the element type id used on every external boundary.
    pub fn type_id(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::ManualTask => "task:manual",
            Self::AutomatedTask => "task:automated",
            Self::ManualTaskCp => "task:manualCp",
            Self::AutomatedTaskCp => "task:automatedCp",
            Self::HybridTask => "task:hybrid",
            Self::AutonomousTask => "task:autonomous",
            Self::CognitiveTask => "task:cognitive",
            Self::Category => "category",
            Self::CategoryCp => "categoryCp",
            Self::Decision => "activityNode:decision",
            Self::Merge => "activityNode:merge",
            Self::Fork => "activityNode:fork",
            Self::Join => "activityNode:join",
            Self::DecisionCp => "activityNode:decisionCp",
            Self::MergeCp => "activityNode:mergeCp",
            Self::ForkCp => "activityNode:forkCp",
            Self::JoinCp => "activityNode:joinCp",
        }
    }

    /// Parses one element type id. Unknown ids yield `None`.
    pub fn from_type_id(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_id() == value)
    }

    pub fn family(self) -> NodeFamily {
        match self {
            Self::Task
            | Self::ManualTask
            | Self::AutomatedTask
            | Self::ManualTaskCp
            | Self::AutomatedTaskCp
            | Self::HybridTask
            | Self::AutonomousTask
            | Self::CognitiveTask => NodeFamily::Task,
            Self::Category | Self::CategoryCp => NodeFamily::Category,
            Self::Decision
            | Self::Merge
            | Self::Fork
            | Self::Join
            | Self::DecisionCp
            | Self::MergeCp
            | Self::ForkCp
            | Self::JoinCp => NodeFamily::Activity,
        }
    }

    /// Short node type name used as a secondary style class.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::ManualTask => "manual",
            Self::AutomatedTask => "automated",
            Self::ManualTaskCp => "manualCp",
            Self::AutomatedTaskCp => "automatedCp",
            Self::HybridTask => "hybrid",
            Self::AutonomousTask => "autonomous",
            Self::CognitiveTask => "cognitive",
            Self::Category => "category",
            Self::CategoryCp => "categoryCp",
            Self::Decision => "decisionNode",
            Self::Merge => "mergeNode",
            Self::Fork => "forkNode",
            Self::Join => "joinNode",
            Self::DecisionCp => "decisionCp",
            Self::MergeCp => "mergeCp",
            Self::ForkCp => "forkCpNode",
            Self::JoinCp => "joinCpNode",
        }
    }

    /// User-facing default name for freshly created nodes.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Task => "New Task",
            Self::ManualTask => "New Manual Task",
            Self::AutomatedTask => "New Automated Task",
            Self::ManualTaskCp => "New Manual Task Cp",
            Self::AutomatedTaskCp => "New Automated Task Cp",
            Self::HybridTask => "New Hybrid Task",
            Self::AutonomousTask => "New Autonomous Task",
            Self::CognitiveTask => "New Cognitive Task",
            Self::Category => "New Category",
            Self::CategoryCp => "New Category Cp",
            // Control nodes render as bare shapes.
            Self::Decision
            | Self::Merge
            | Self::Fork
            | Self::Join
            | Self::DecisionCp
            | Self::MergeCp
            | Self::ForkCp
            | Self::JoinCp => "",
        }
    }

    pub fn is_decision(self) -> bool {
        matches!(self, Self::Decision | Self::DecisionCp)
    }
}

/// Closed set of edge kinds known to the workflow diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    #[serde(rename = "edge")]
    Transition,
    #[serde(rename = "edge:category")]
    CategoryEdge,
    #[serde(rename = "edge:cp")]
    EdgeCp,
    #[serde(rename = "edge:weighted")]
    Weighted,
    #[serde(rename = "edge:weightedCp")]
    WeightedCp,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::Transition,
        EdgeKind::CategoryEdge,
        EdgeKind::EdgeCp,
        EdgeKind::Weighted,
        EdgeKind::WeightedCp,
    ];

    pub fn type_id(self) -> &'static str {
        match self {
            Self::Transition => "edge",
            Self::CategoryEdge => "edge:category",
            Self::EdgeCp => "edge:cp",
            Self::Weighted => "edge:weighted",
            Self::WeightedCp => "edge:weightedCp",
        }
    }

    pub fn from_type_id(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_id() == value)
    }

    /// Weighted edges carry a branch probability.
    pub fn is_weighted(self) -> bool {
        matches!(self, Self::Weighted | Self::WeightedCp)
    }
}

/// Branch probability carried by weighted edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Probability {
    Low,
    #[default]
    Medium,
    High,
}

impl Probability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EdgeKind, NodeFamily, NodeKind};

    #[test]
    fn node_type_ids_parse_back_to_same_kind() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_type_id(kind.type_id()), Some(kind));
        }
        assert_eq!(NodeKind::from_type_id("task:unknown"), None);
    }

    #[test]
    fn serde_uses_type_ids() {
        let json = serde_json::to_string(&NodeKind::DecisionCp).unwrap();
        assert_eq!(json, "\"activityNode:decisionCp\"");
        let edge: EdgeKind = serde_json::from_str("\"edge:weighted\"").unwrap();
        assert_eq!(edge, EdgeKind::Weighted);
    }

    #[test]
    fn families_group_kinds() {
        assert_eq!(NodeKind::HybridTask.family(), NodeFamily::Task);
        assert_eq!(NodeKind::CategoryCp.family(), NodeFamily::Category);
        assert_eq!(NodeKind::JoinCp.family(), NodeFamily::Activity);
    }
}
