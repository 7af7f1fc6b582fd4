use crate::ids::ContractorID;

/// A contracting firm engaged on one or more road projects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contractor {
    pub id: ContractorID,
    /// Unique firm name.
    pub name: String,
    pub contact_email: String,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub contact_phone: Option<String>,
}
