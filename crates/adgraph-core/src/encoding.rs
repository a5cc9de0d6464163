//! Visual encoding contract.
//!
//! Pure functions from node/link attributes to rendering parameters. The
//! renderer calls these per frame; nothing here draws or lays out.
//!
//! The confidence ring is an uncertainty encoding, not decoration: every
//! attribute of [`RingStyle`] is strictly increasing from `very_low` to
//! `high`, and clients interpret the graph through that ordering.

use serde::Serialize;

use crate::model::{ConfidenceLevel, GraphNode, NodeType, RelType};

pub const RADIUS_BASE: f64 = 4.0;
pub const RADIUS_PER_SQRT_DEGREE: f64 = 1.6;
pub const RANK_BOOST_MAX: f64 = 4.0;
pub const RADIUS_MAX: f64 = 20.0;

/// Labels are always shown above this degree.
pub const LABEL_DEGREE_THRESHOLD: u32 = 8;
/// Labels are always shown above this zoom factor.
pub const LABEL_ZOOM_THRESHOLD: f64 = 1.5;

pub const NEUTRAL_COLOR: &str = "#9ca3af";
pub const DEFAULT_LINK_COLOR: &str = "#cbd5e1";
pub const DEFAULT_LINK_WIDTH: f64 = 1.0;
pub const EMPHASIS_LINK_WIDTH: f64 = 2.5;

/// Node radius in canvas units.
///
/// Non-decreasing in degree, boosted by a rank score in `[0, 1]` when
/// present, and saturating at [`RADIUS_MAX`].
pub fn node_radius(node: &GraphNode) -> f64 {
    let boost = node
        .rank_score
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 1.0) * RANK_BOOST_MAX)
        .unwrap_or(0.0);
    let radius = RADIUS_BASE + RADIUS_PER_SQRT_DEGREE * f64::from(node.degree).sqrt() + boost;
    radius.min(RADIUS_MAX)
}

/// Fill color for a node type.
pub fn node_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Person => "#2563eb",
        NodeType::Designer => "#d97706",
        NodeType::Location => "#059669",
        NodeType::Style => "#7c3aed",
        NodeType::Issue => "#475569",
        NodeType::Author => "#0891b2",
        NodeType::EpsteinBlackBook => "#111827",
        NodeType::EpsteinFlightLogs => "#b91c1c",
        NodeType::EpsteinDojLibrary => "#9f1239",
        NodeType::EpsteinCourtRecords => "#be185d",
        NodeType::EpsteinSource => "#dc2626",
    }
}

/// Fill color for a serialized type name; unknown names get [`NEUTRAL_COLOR`].
pub fn node_color_by_name(node_type: &str) -> &'static str {
    NodeType::parse(node_type).map(node_color).unwrap_or(NEUTRAL_COLOR)
}

/// Uncertainty ring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingStyle {
    pub glow_blur: f64,
    pub ring_opacity: f64,
    pub fill_opacity: f64,
}

/// Ring parameters for a confidence tier.
pub fn ring_style(level: ConfidenceLevel) -> RingStyle {
    let (glow_blur, ring_opacity, fill_opacity) = match level {
        ConfidenceLevel::VeryLow => (2.0, 0.25, 0.35),
        ConfidenceLevel::Low => (4.0, 0.40, 0.50),
        ConfidenceLevel::Medium => (6.0, 0.55, 0.65),
        ConfidenceLevel::Good => (9.0, 0.75, 0.80),
        ConfidenceLevel::High => (12.0, 0.95, 0.95),
    };
    RingStyle {
        glow_blur,
        ring_opacity,
        fill_opacity,
    }
}

/// Ring for a node, or `None` when it carries no confidence signal.
pub fn confidence_ring(node: &GraphNode) -> Option<RingStyle> {
    node.confidence_level().map(ring_style)
}

/// Interaction state supplied by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelContext {
    pub selected: bool,
    pub hovered: bool,
    pub zoom: f64,
}

impl Default for LabelContext {
    fn default() -> Self {
        Self {
            selected: false,
            hovered: false,
            zoom: 1.0,
        }
    }
}

pub fn label_visible(node: &GraphNode, ctx: &LabelContext) -> bool {
    ctx.selected
        || ctx.hovered
        || node.degree > LABEL_DEGREE_THRESHOLD
        || ctx.zoom > LABEL_ZOOM_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkStyle {
    pub color: &'static str,
    pub width: f64,
}

/// Link style by relationship kind. Cross-corpus appearances and hires are
/// drawn wider.
pub fn link_style(rel_type: &RelType) -> LinkStyle {
    let (color, width) = match rel_type {
        RelType::AppearsIn => ("#dc2626", EMPHASIS_LINK_WIDTH),
        RelType::Hired => ("#d97706", EMPHASIS_LINK_WIDTH),
        RelType::FeaturedIn => ("#64748b", DEFAULT_LINK_WIDTH),
        RelType::LocatedIn => ("#10b981", DEFAULT_LINK_WIDTH),
        RelType::HasStyle => ("#a78bfa", DEFAULT_LINK_WIDTH),
        RelType::Wrote => ("#22d3ee", DEFAULT_LINK_WIDTH),
        RelType::MentionedIn => ("#f87171", DEFAULT_LINK_WIDTH),
        RelType::AssociatedWith => ("#94a3b8", DEFAULT_LINK_WIDTH),
        RelType::Other(_) => (DEFAULT_LINK_COLOR, DEFAULT_LINK_WIDTH),
    };
    LinkStyle { color, width }
}

/// All rendering parameters for one node in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEncoding {
    pub radius: f64,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<RingStyle>,
    pub show_label: bool,
}

pub fn encode_node(node: &GraphNode, ctx: &LabelContext) -> NodeEncoding {
    NodeEncoding {
        radius: node_radius(node),
        color: node_color(node.node_type),
        ring: confidence_ring(node),
        show_label: label_visible(node, ctx),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaletteEntry {
    #[serde(rename = "nodeType")]
    pub node_type: NodeType,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RingEntry {
    pub level: ConfidenceLevel,
    #[serde(flatten)]
    pub style: RingStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkEntry {
    #[serde(rename = "relType")]
    pub rel_type: RelType,
    #[serde(flatten)]
    pub style: LinkStyle,
}

/// The whole encoding contract as data, for legends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub nodes: Vec<PaletteEntry>,
    pub neutral_color: &'static str,
    pub confidence: Vec<RingEntry>,
    pub links: Vec<LinkEntry>,
    pub default_link: LinkStyle,
    pub label_degree_threshold: u32,
    pub label_zoom_threshold: f64,
    pub radius_max: f64,
}

pub fn legend() -> Legend {
    Legend {
        nodes: NodeType::ALL
            .into_iter()
            .map(|node_type| PaletteEntry {
                node_type,
                color: node_color(node_type),
            })
            .collect(),
        neutral_color: NEUTRAL_COLOR,
        confidence: ConfidenceLevel::ALL
            .into_iter()
            .map(|level| RingEntry {
                level,
                style: ring_style(level),
            })
            .collect(),
        links: RelType::KNOWN
            .into_iter()
            .map(|rel_type| {
                let style = link_style(&rel_type);
                LinkEntry { rel_type, style }
            })
            .collect(),
        default_link: link_style(&RelType::Other(String::new())),
        label_degree_threshold: LABEL_DEGREE_THRESHOLD,
        label_zoom_threshold: LABEL_ZOOM_THRESHOLD,
        radius_max: RADIUS_MAX,
    }
}
