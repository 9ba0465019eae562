//! Texture-channel role classification by filename pattern.
//!
//! Classifies flat lists of texture file paths into semantic channel roles
//! with case-insensitive substring matching. The pattern list is ordered and
//! the first matching role wins, so a path never lands in two roles.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic purpose of a texture map within a material.
///
/// Ordering is the build order: networks wire channels in declaration order,
/// with displacement last.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Diffuse,
    Specular,
    Gloss,
    Roughness,
    Metal,
    Normal,
    Opacity,
    Subsurface,
    Displacement,
}

/// Ordered pattern table. Only roles that can be recognized from a filename
/// appear here; opacity, subsurface and displacement are assigned explicitly
/// by artists or records, never inferred.
const ROLE_PATTERNS: &[(Role, &[&str])] = &[
    (Role::Diffuse, &["diffuse", "basecolor", "albedo"]),
    (Role::Specular, &["specular"]),
    (Role::Gloss, &["gloss"]),
    (Role::Roughness, &["roughness"]),
    (Role::Normal, &["normal"]),
    (Role::Metal, &["metal"]),
];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Diffuse => "diffuse",
            Role::Specular => "specular",
            Role::Gloss => "gloss",
            Role::Roughness => "roughness",
            Role::Metal => "metal",
            Role::Normal => "normal",
            Role::Opacity => "opacity",
            Role::Subsurface => "subsurface",
            Role::Displacement => "displacement",
        }
    }

    /// Classify a single path. Returns the first role whose pattern set
    /// matches the lowercased path, or `None` for unrecognized maps.
    pub fn match_path(path: &str) -> Option<Role> {
        let lowered = path.to_lowercase();
        ROLE_PATTERNS.iter().find_map(|(role, patterns)| {
            patterns
                .iter()
                .any(|p| lowered.contains(p))
                .then_some(*role)
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a list of paths: one path per recognized role plus
/// the residue of unrecognized paths in input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Classification {
    pub textures: BTreeMap<Role, String>,
    pub unknown: Vec<String>,
}

/// Classify a discovery-ordered list of texture paths.
///
/// When several paths satisfy the same role the last one in input order
/// wins, mirroring how repeated assignment overwrites a channel slot. Empty
/// input yields empty outputs; there are no error conditions.
pub fn classify_paths<I, P>(paths: I) -> Classification
where
    I: IntoIterator<Item = P>,
    P: Into<String>,
{
    let mut result = Classification::default();
    for path in paths {
        let path = path.into();
        match Role::match_path(&path) {
            Some(role) => {
                result.textures.insert(role, path);
            }
            None => result.unknown.push(path),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classification_is_case_insensitive() {
        let result = classify_paths([
            "wood_diffuse.png",
            "wood_ROUGHNESS.png",
            "unlabeled_01.png",
        ]);

        assert_eq!(
            result.textures.get(&Role::Diffuse).map(String::as_str),
            Some("wood_diffuse.png")
        );
        assert_eq!(
            result.textures.get(&Role::Roughness).map(String::as_str),
            Some("wood_ROUGHNESS.png")
        );
        assert_eq!(result.textures.len(), 2);
        assert_eq!(result.unknown, vec!["unlabeled_01.png".to_string()]);
    }

    #[test]
    fn last_path_wins_when_a_role_matches_twice() {
        let result = classify_paths(["x_basecolor.png", "x_albedo.png"]);

        assert_eq!(
            result.textures.get(&Role::Diffuse).map(String::as_str),
            Some("x_albedo.png")
        );
        assert_eq!(result.textures.len(), 1);
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn first_role_in_table_order_wins_per_path() {
        // The path matches both normal and metal; normal is checked first
        // in the pattern table.
        assert_eq!(Role::match_path("brushed_normal_metal.exr"), Some(Role::Normal));
        assert_eq!(Role::match_path("brushed_metal.exr"), Some(Role::Metal));
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        let result = classify_paths(Vec::<String>::new());
        assert!(result.textures.is_empty());
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn unmatched_paths_keep_input_order() {
        let result = classify_paths(["b.png", "a.png", "c.png"]);
        assert_eq!(result.unknown, vec!["b.png", "a.png", "c.png"]);
    }

    proptest! {
        /// Every input path lands in exactly one bucket: either as the value
        /// of some role or in the unknown residue.
        #[test]
        fn every_path_is_accounted_for(paths in prop::collection::vec("[a-zA-Z0-9_./]{0,24}", 0..12)) {
            let result = classify_paths(paths.clone());
            let classified = result.textures.len() + result.unknown.len();
            // Roles may collapse duplicates, unknowns may not.
            prop_assert!(classified <= paths.len());
            let unknown_from_input = paths.iter().filter(|p| Role::match_path(p).is_none()).count();
            prop_assert_eq!(result.unknown.len(), unknown_from_input);
            for path in result.textures.values().chain(result.unknown.iter()) {
                prop_assert!(paths.contains(path));
            }
        }

        /// Uppercasing the input never changes which role a path matches.
        #[test]
        fn matching_ignores_case(path in "[a-z0-9_./]{0,32}") {
            prop_assert_eq!(Role::match_path(&path), Role::match_path(&path.to_uppercase()));
        }
    }
}
