//! Client-renderable graph data model.
//!
//! Every preset produces a [`GraphData`]. Node ids are derived only from
//! `(node type, key)`, which is what makes dedup across paths and presets
//! correct.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Display label given to nodes whose name could not be resolved.
/// Nodes carrying it are dropped during normalization.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Kind of entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Person,
    Designer,
    Location,
    Style,
    Issue,
    Author,
    EpsteinBlackBook,
    EpsteinFlightLogs,
    EpsteinDojLibrary,
    EpsteinCourtRecords,
    EpsteinSource,
}

impl NodeType {
    pub const ALL: [NodeType; 11] = [
        Self::Person,
        Self::Designer,
        Self::Location,
        Self::Style,
        Self::Issue,
        Self::Author,
        Self::EpsteinBlackBook,
        Self::EpsteinFlightLogs,
        Self::EpsteinDojLibrary,
        Self::EpsteinCourtRecords,
        Self::EpsteinSource,
    ];

    /// Resolve a node type from a store label.
    ///
    /// Source documents are refined by their `name` property. Labels this
    /// layer has never seen fall back to `Person`.
    pub fn from_label(label: &str, name: Option<&str>) -> Self {
        match label {
            "Person" => Self::Person,
            "Designer" => Self::Designer,
            "Location" => Self::Location,
            "Style" => Self::Style,
            "Issue" => Self::Issue,
            "Author" => Self::Author,
            "EpsteinSource" => Self::source_from_name(name.unwrap_or_default()),
            _ => Self::Person,
        }
    }

    fn source_from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("black book") {
            Self::EpsteinBlackBook
        } else if name.contains("flight") {
            Self::EpsteinFlightLogs
        } else if name.contains("doj") || name.contains("justice") {
            Self::EpsteinDojLibrary
        } else if name.contains("court") || name.contains("deposition") {
            Self::EpsteinCourtRecords
        } else {
            Self::EpsteinSource
        }
    }

    /// Parse the serialized name (e.g. `"designer"`).
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Designer => "designer",
            Self::Location => "location",
            Self::Style => "style",
            Self::Issue => "issue",
            Self::Author => "author",
            Self::EpsteinBlackBook => "epstein_black_book",
            Self::EpsteinFlightLogs => "epstein_flight_logs",
            Self::EpsteinDojLibrary => "epstein_doj_library",
            Self::EpsteinCourtRecords => "epstein_court_records",
            Self::EpsteinSource => "epstein_source",
        }
    }

    pub fn is_epstein_source(&self) -> bool {
        matches!(
            self,
            Self::EpsteinBlackBook
                | Self::EpsteinFlightLogs
                | Self::EpsteinDojLibrary
                | Self::EpsteinCourtRecords
                | Self::EpsteinSource
        )
    }
}

/// Relationship kind carried by a link.
///
/// Types the store introduces later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelType {
    FeaturedIn,
    Hired,
    LocatedIn,
    HasStyle,
    Wrote,
    AppearsIn,
    MentionedIn,
    AssociatedWith,
    Other(String),
}

impl RelType {
    pub const KNOWN: [RelType; 8] = [
        Self::FeaturedIn,
        Self::Hired,
        Self::LocatedIn,
        Self::HasStyle,
        Self::Wrote,
        Self::AppearsIn,
        Self::MentionedIn,
        Self::AssociatedWith,
    ];

    pub fn from_store(s: &str) -> Self {
        match s {
            "FEATURED_IN" => Self::FeaturedIn,
            "HIRED" => Self::Hired,
            "LOCATED_IN" => Self::LocatedIn,
            "HAS_STYLE" => Self::HasStyle,
            "WROTE" => Self::Wrote,
            "APPEARS_IN" => Self::AppearsIn,
            "MENTIONED_IN" => Self::MentionedIn,
            "ASSOCIATED_WITH" => Self::AssociatedWith,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::FeaturedIn => "FEATURED_IN",
            Self::Hired => "HIRED",
            Self::LocatedIn => "LOCATED_IN",
            Self::HasStyle => "HAS_STYLE",
            Self::Wrote => "WROTE",
            Self::AppearsIn => "APPEARS_IN",
            Self::MentionedIn => "MENTIONED_IN",
            Self::AssociatedWith => "ASSOCIATED_WITH",
            Self::Other(s) => s,
        }
    }
}

impl Serialize for RelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_store(&s))
    }
}

/// How certain a match or verdict is. Ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    Good,
    High,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 5] = [
        Self::VeryLow,
        Self::Low,
        Self::Medium,
        Self::Good,
        Self::High,
    ];

    /// Parse an explicit confidence tier.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "very_low" => Some(Self::VeryLow),
            "low" => Some(Self::Low),
            "medium" | "moderate" => Some(Self::Medium),
            "good" => Some(Self::Good),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Map a match verdict onto a confidence tier.
    pub fn from_verdict(verdict: &str) -> Option<Self> {
        match verdict.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "confirmed" | "yes" => Some(Self::High),
            "likely" => Some(Self::Good),
            "possible" | "needs_review" => Some(Self::Medium),
            "unlikely" => Some(Self::Low),
            "rejected" | "no" => Some(Self::VeryLow),
            _ => None,
        }
    }

    /// Derive from a node's confidence and verdict attributes.
    ///
    /// An explicit tier wins over the verdict. `None` means no confidence
    /// signal at all.
    pub fn derive(confidence: Option<&str>, verdict: Option<&str>) -> Option<Self> {
        confidence
            .and_then(Self::parse)
            .or_else(|| verdict.and_then(Self::from_verdict))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Good => "good",
            Self::High => "high",
        }
    }
}

/// A node in the client graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub node_type: NodeType,
    pub degree: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centrality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<i64>,
}

impl GraphNode {
    /// Build the stable id for a node.
    pub fn make_id(node_type: NodeType, key: &str) -> String {
        format!("{}:{}", node_type.as_str(), key)
    }

    /// A bare node with no optional attributes.
    pub fn new(node_type: NodeType, key: &str, label: impl Into<String>) -> Self {
        Self {
            id: Self::make_id(node_type, key),
            label: label.into(),
            node_type,
            degree: 0,
            verdict: None,
            confidence: None,
            rank_score: None,
            centrality: None,
            community: None,
            lat: None,
            lng: None,
            city: None,
            country: None,
            year: None,
            month: None,
            feature_id: None,
        }
    }

    pub fn confidence_level(&self) -> Option<ConfidenceLevel> {
        ConfidenceLevel::derive(self.confidence.as_deref(), self.verdict.as_deref())
    }

    /// True when the label is the unresolved-name sentinel.
    pub fn has_unknown_label(&self) -> bool {
        self.label.trim().eq_ignore_ascii_case(UNKNOWN_LABEL)
    }
}

/// A directed, typed link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub rel_type: RelType,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl GraphLink {
    /// The identity of a link: `(source, target, relType)`.
    pub fn key(&self) -> (String, String, RelType) {
        (self.source.clone(), self.target.clone(), self.rel_type.clone())
    }
}

/// Output of every graph preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_from_label() {
        assert_eq!(NodeType::from_label("Designer", None), NodeType::Designer);
        assert_eq!(NodeType::from_label("Issue", Some("March 1998")), NodeType::Issue);
        assert_eq!(NodeType::from_label("Yacht", None), NodeType::Person);
    }

    #[test]
    fn test_source_subtypes() {
        assert_eq!(
            NodeType::from_label("EpsteinSource", Some("Little Black Book")),
            NodeType::EpsteinBlackBook
        );
        assert_eq!(
            NodeType::from_label("EpsteinSource", Some("Flight Logs 1995-2005")),
            NodeType::EpsteinFlightLogs
        );
        assert_eq!(
            NodeType::from_label("EpsteinSource", Some("DOJ Epstein Library")),
            NodeType::EpsteinDojLibrary
        );
        assert_eq!(
            NodeType::from_label("EpsteinSource", Some("Giuffre v. Maxwell court filings")),
            NodeType::EpsteinCourtRecords
        );
        assert_eq!(NodeType::from_label("EpsteinSource", None), NodeType::EpsteinSource);
    }

    #[test]
    fn test_node_type_serializes_snake_case() {
        let json = serde_json::to_string(&NodeType::EpsteinFlightLogs).unwrap();
        assert_eq!(json, "\"epstein_flight_logs\"");
        for t in NodeType::ALL {
            assert_eq!(NodeType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_rel_type_keeps_unknown_kinds() {
        assert_eq!(RelType::from_store("HIRED"), RelType::Hired);
        let other = RelType::from_store("SAILED_WITH");
        assert_eq!(other.as_str(), "SAILED_WITH");
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"SAILED_WITH\"");
    }

    #[test]
    fn test_confidence_derivation() {
        assert_eq!(ConfidenceLevel::derive(Some("HIGH"), Some("rejected")), Some(ConfidenceLevel::High));
        assert_eq!(ConfidenceLevel::derive(None, Some("likely")), Some(ConfidenceLevel::Good));
        assert_eq!(ConfidenceLevel::derive(Some("very low"), None), Some(ConfidenceLevel::VeryLow));
        assert_eq!(ConfidenceLevel::derive(Some("whatever"), Some("needs_review")), Some(ConfidenceLevel::Medium));
        assert_eq!(ConfidenceLevel::derive(None, None), None);
        assert_eq!(ConfidenceLevel::derive(None, Some("pending")), None);
    }

    #[test]
    fn test_confidence_ordering() {
        let mut levels = ConfidenceLevel::ALL.to_vec();
        levels.reverse();
        levels.sort();
        assert_eq!(levels, ConfidenceLevel::ALL.to_vec());
    }

    #[test]
    fn test_node_json_shape() {
        let mut node = GraphNode::new(NodeType::Person, "Jane Doe", "Jane Doe");
        node.degree = 3;
        node.rank_score = Some(0.5);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "person:Jane Doe");
        assert_eq!(json["nodeType"], "person");
        assert_eq!(json["rankScore"], 0.5);
        assert!(json.get("verdict").is_none());
    }

    #[test]
    fn test_unknown_label_detection() {
        assert!(GraphNode::new(NodeType::Person, "x", " unknown ").has_unknown_label());
        assert!(!GraphNode::new(NodeType::Person, "x", "Unknowable Inc").has_unknown_label());
    }
}
