// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Deterministic pseudo-features derived from image bytes

use serde::{Deserialize, Serialize};

use crate::catalog::{LeafShape, PlantCategory};

/// Number of leading bytes that feed the hash
pub const HASH_PREFIX_LEN: usize = 100;

/// Categories the extractor can report, in bucket order
pub const FEATURE_CATEGORIES: [PlantCategory; 7] = [
    PlantCategory::Climber,
    PlantCategory::Succulent,
    PlantCategory::Flowering,
    PlantCategory::Aromatic,
    PlantCategory::Tree,
    PlantCategory::Fern,
    PlantCategory::Cactus,
];

/// Leaf shapes the extractor can report, in bucket order
pub const FEATURE_LEAF_SHAPES: [LeafShape; 9] = [
    LeafShape::Heart,
    LeafShape::Oval,
    LeafShape::Long,
    LeafShape::Round,
    LeafShape::Perforated,
    LeafShape::Lobed,
    LeafShape::Fleshy,
    LeafShape::Serrated,
    LeafShape::Needle,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

/// Features "seen" in a photo. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFeatures {
    pub category: PlantCategory,
    pub leaf_shape: LeafShape,
    pub has_flowers: bool,
    pub is_succulent: bool,
    pub size_class: SizeClass,
    /// 0.60 - 0.99
    pub image_quality: f64,
}

/// Rolling `hash * 31 + byte` over the first 100 bytes, wrapped to i32,
/// returned as its absolute value.
pub fn image_hash(data: &[u8]) -> u32 {
    let hash = data
        .iter()
        .take(HASH_PREFIX_LEN)
        .fold(0i32, |h, &b| h.wrapping_mul(31).wrapping_add(i32::from(b)));
    // i32::MIN has no positive i32 counterpart
    hash.unsigned_abs()
}

/// Derive the feature bucket for an image
pub fn extract_features(data: &[u8]) -> ExtractedFeatures {
    features_from_hash(image_hash(data))
}

pub fn features_from_hash(hash: u32) -> ExtractedFeatures {
    let h = u64::from(hash);
    let category = FEATURE_CATEGORIES[(h % FEATURE_CATEGORIES.len() as u64) as usize];
    let leaf_shape = FEATURE_LEAF_SHAPES[((h * 3) % FEATURE_LEAF_SHAPES.len() as u64) as usize];
    let size_class = match h % 3 {
        0 => SizeClass::Small,
        1 => SizeClass::Medium,
        _ => SizeClass::Large,
    };

    ExtractedFeatures {
        category,
        leaf_shape,
        has_flowers: h % 4 == 0,
        is_succulent: h % 5 == 0,
        size_class,
        image_quality: 0.6 + (h % 40) as f64 / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_degenerate_hash() {
        assert_eq!(image_hash(&[]), 0);
        let f = extract_features(&[]);
        assert_eq!(f.category, PlantCategory::Climber);
        assert_eq!(f.leaf_shape, LeafShape::Heart);
        assert!(f.has_flowers);
        assert!(f.is_succulent);
        assert_eq!(f.size_class, SizeClass::Small);
        assert!((f.image_quality - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_known_hash_bucket() {
        // 65 * 31 + 66
        assert_eq!(image_hash(b"AB"), 2081);
        let f = extract_features(b"AB");
        assert_eq!(f.category, PlantCategory::Flowering);
        assert_eq!(f.leaf_shape, LeafShape::Fleshy);
        assert!(!f.has_flowers);
        assert!(!f.is_succulent);
        assert_eq!(f.size_class, SizeClass::Large);
        assert!((f.image_quality - 0.61).abs() < 1e-9);
    }

    #[test]
    fn test_only_prefix_is_hashed() {
        let mut a = vec![7u8; 150];
        let b = a.clone();
        a[120] = 42;
        assert_eq!(image_hash(&a), image_hash(&b));
        a[10] = 42;
        assert_ne!(image_hash(&a), image_hash(&b));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        assert_eq!(extract_features(&data), extract_features(&data));
    }

    #[test]
    fn test_i32_min_maps_to_positive() {
        let f = features_from_hash(i32::MIN.unsigned_abs());
        assert!(FEATURE_CATEGORIES.contains(&f.category));
        assert!(FEATURE_LEAF_SHAPES.contains(&f.leaf_shape));
    }

    #[test]
    fn test_quality_range() {
        for hash in 0..200u32 {
            let q = features_from_hash(hash).image_quality;
            assert!((0.6..=0.99 + 1e-9).contains(&q), "quality {} out of range", q);
        }
    }

    #[test]
    fn test_large_hash_leaf_shape_no_overflow() {
        let f = features_from_hash(u32::MAX);
        let expected = FEATURE_LEAF_SHAPES[((u64::from(u32::MAX) * 3) % 9) as usize];
        assert_eq!(f.leaf_shape, expected);
    }
}
