//! Feature type classification
//!
//! Slicers name their features differently (`External perimeter`,
//! `WALL-OUTER`, `Outer wall`...). The text after a feature marker is
//! matched against an ordered keyword list; the first keyword found wins.

use gcodetools_parser::MoveType;

/// Keyword lookup order; earlier entries shadow later ones
const KEYWORDS: [(&str, MoveType); 16] = [
    ("skirt", MoveType::Skirt),
    ("external", MoveType::ExternalPerimeter),
    ("overhang", MoveType::OverhangPerimeter),
    ("outer", MoveType::ExternalPerimeter),
    ("perimeter", MoveType::InternalPerimeter),
    ("inner", MoveType::InternalPerimeter),
    ("wall", MoveType::InternalPerimeter),
    ("bridge", MoveType::Bridge),
    ("top", MoveType::TopSolidInfill),
    ("solid", MoveType::SolidInfill),
    ("internal", MoveType::SparseInfill),
    ("sparse", MoveType::SparseInfill),
    ("fill", MoveType::SparseInfill),
    ("skin", MoveType::SolidInfill),
    ("bottom", MoveType::SolidInfill),
    ("support", MoveType::Support),
];

/// Classify a slicer feature name
pub fn classify(feature: &str) -> MoveType {
    let feature = feature.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| feature.contains(keyword))
        .map_or(MoveType::Custom, |&(_, move_type)| move_type)
}
