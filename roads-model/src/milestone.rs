use crate::ids::MilestoneID;

/// A named delivery phase shared across road projects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Milestone {
    pub id: MilestoneID,
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
    /// pending, in-progress or completed.
    pub status: String,
}

impl Milestone {
    pub const DEFAULT_STATUS: &'static str = "pending";
}
