// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Static plant catalog used by the classifier
//!
//! The catalog is loaded once at startup, either from the built-in table or
//! from a JSON file, and is never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::{PlantVisionError, Result};

/// Broad plant category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantCategory {
    Climber,
    Succulent,
    Flowering,
    Aromatic,
    Tree,
    Fern,
    Cactus,
    Ornamental,
    Orchid,
    Shrub,
    Aquatic,
    Carnivorous,
}

impl PlantCategory {
    pub const ALL: [PlantCategory; 12] = [
        PlantCategory::Climber,
        PlantCategory::Succulent,
        PlantCategory::Flowering,
        PlantCategory::Aromatic,
        PlantCategory::Tree,
        PlantCategory::Fern,
        PlantCategory::Cactus,
        PlantCategory::Ornamental,
        PlantCategory::Orchid,
        PlantCategory::Shrub,
        PlantCategory::Aquatic,
        PlantCategory::Carnivorous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantCategory::Climber => "climber",
            PlantCategory::Succulent => "succulent",
            PlantCategory::Flowering => "flowering",
            PlantCategory::Aromatic => "aromatic",
            PlantCategory::Tree => "tree",
            PlantCategory::Fern => "fern",
            PlantCategory::Cactus => "cactus",
            PlantCategory::Ornamental => "ornamental",
            PlantCategory::Orchid => "orchid",
            PlantCategory::Shrub => "shrub",
            PlantCategory::Aquatic => "aquatic",
            PlantCategory::Carnivorous => "carnivorous",
        }
    }
}

impl fmt::Display for PlantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PlantCategory {
    type Err = PlantVisionError;

    fn from_str(s: &str) -> Result<Self> {
        PlantCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlantVisionError::Config(format!("Unknown plant category: {}", s)))
    }
}

/// Leaf outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafShape {
    Heart,
    Oval,
    Long,
    Round,
    Perforated,
    Lobed,
    Fleshy,
    Serrated,
    Needle,
    Fiddle,
    Spine,
    Trap,
}

impl LeafShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafShape::Heart => "heart",
            LeafShape::Oval => "oval",
            LeafShape::Long => "long",
            LeafShape::Round => "round",
            LeafShape::Perforated => "perforated",
            LeafShape::Lobed => "lobed",
            LeafShape::Fleshy => "fleshy",
            LeafShape::Serrated => "serrated",
            LeafShape::Needle => "needle",
            LeafShape::Fiddle => "fiddle",
            LeafShape::Spine => "spine",
            LeafShape::Trap => "trap",
        }
    }
}

impl fmt::Display for LeafShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Baseline care instructions for a species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareGuide {
    pub watering: String,
    pub lighting: String,
    pub temperature: String,
    pub soil: String,
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub category: PlantCategory,
    pub leaf_shape: LeafShape,
    pub care_tips: CareGuide,
}

/// Ordered, immutable, non-empty set of plant records
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<PlantRecord>,
}

impl Catalog {
    /// Build a catalog; an empty record list is a configuration error
    pub fn new(records: Vec<PlantRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(PlantVisionError::Config(
                "Plant catalog must contain at least one record".to_string(),
            ));
        }
        Ok(Self { records })
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self { records: builtin_records() }
    }

    /// Load a catalog from a JSON array of plant records
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<PlantRecord> = serde_json::from_str(&content).map_err(|e| {
            PlantVisionError::Config(format!("Failed to parse catalog {:?}: {}", path, e))
        })?;
        let catalog = Self::new(records)?;
        info!("Loaded {} plants from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Load from `path` when given, otherwise use the built-in table
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn records(&self) -> &[PlantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn by_category(&self, category: PlantCategory) -> Vec<&PlantRecord> {
        self.records.iter().filter(|r| r.category == category).collect()
    }

    pub fn by_leaf_shape(&self, shape: LeafShape) -> Vec<&PlantRecord> {
        self.records.iter().filter(|r| r.leaf_shape == shape).collect()
    }

    pub fn by_categories(&self, categories: &[PlantCategory]) -> Vec<&PlantRecord> {
        self.records
            .iter()
            .filter(|r| categories.contains(&r.category))
            .collect()
    }
}

fn plant(
    common_name: &str,
    scientific_name: &str,
    description: &str,
    category: PlantCategory,
    leaf_shape: LeafShape,
    tips: [&str; 4],
) -> PlantRecord {
    let [watering, lighting, temperature, soil] = tips;
    PlantRecord {
        common_name: common_name.to_string(),
        scientific_name: scientific_name.to_string(),
        description: description.to_string(),
        category,
        leaf_shape,
        care_tips: CareGuide {
            watering: watering.to_string(),
            lighting: lighting.to_string(),
            temperature: temperature.to_string(),
            soil: soil.to_string(),
        },
    }
}

fn builtin_records() -> Vec<PlantRecord> {
    use LeafShape as L;
    use PlantCategory as C;

    vec![
        // Indoor plants
        plant(
            "Golden Pothos",
            "Epipremnum aureum",
            "Popular trailing climber, ideal indoors. Known for its heart-shaped leaves.",
            C::Climber,
            L::Heart,
            [
                "Water when the soil is dry to the touch, usually once or twice a week",
                "Bright indirect light, avoid direct sun",
                "18-24°C, keep away from cold drafts",
                "Well-drained soil, indoor potting mix",
            ],
        ),
        plant(
            "Swiss Cheese Plant",
            "Monstera deliciosa",
            "Tropical plant with large, characteristically perforated leaves. Very popular in modern decor.",
            C::Climber,
            L::Perforated,
            [
                "Keep the soil slightly moist, water when the surface is dry",
                "Medium to bright indirect light",
                "20-25°C, high humidity preferred",
                "Rich, well-drained soil with organic matter",
            ],
        ),
        plant(
            "Snake Plant",
            "Sansevieria trifasciata",
            "Hardy succulent known for purifying the air. Ideal for beginners.",
            C::Succulent,
            L::Long,
            [
                "Water rarely, only when the soil is completely dry",
                "Tolerates low light but prefers indirect light",
                "18-27°C, very tolerant of swings",
                "Well-drained soil, avoid excess water",
            ],
        ),
        plant(
            "ZZ Plant",
            "Zamioculcas zamiifolia",
            "Extremely hardy African plant, ideal for rooms with little light.",
            C::Succulent,
            L::Oval,
            [
                "Water very little, every 2-3 weeks",
                "Adapts to low light but grows better in indirect light",
                "18-26°C, very tolerant",
                "Well-drained soil, cactus mix",
            ],
        ),
        plant(
            "Fiddle-Leaf Fig",
            "Ficus lyrata",
            "Indoor tree with large violin-shaped leaves. Very decorative.",
            C::Tree,
            L::Fiddle,
            [
                "Water when the soil is dry 2-3 cm deep",
                "Bright indirect light, a few hours of morning sun",
                "20-25°C, avoid sudden changes",
                "Well-drained soil rich in organic matter",
            ],
        ),
        plant(
            "Lacy Tree Philodendron",
            "Philodendron bipinnatifidum",
            "Tropical plant with large, deeply cut leaves, ideal for spacious rooms.",
            C::Climber,
            L::Lobed,
            [
                "Keep the soil moist but not soggy",
                "Medium to bright indirect light",
                "20-28°C, high humidity",
                "Rich, well-drained soil",
            ],
        ),
        plant(
            "Flamingo Flower",
            "Anthurium andraeanum",
            "Tropical plant with bright red heart-shaped flowers.",
            C::Flowering,
            L::Heart,
            [
                "Keep the soil slightly moist, high humidity",
                "Bright indirect light, no direct sun",
                "20-25°C, humid environment",
                "Well-drained soil rich in organic matter",
            ],
        ),
        plant(
            "Dragon Tree",
            "Dracaena marginata",
            "Indoor tree with long, narrow leaves. Very hardy.",
            C::Tree,
            L::Long,
            [
                "Water when the soil is dry, avoid excess",
                "Medium indirect light, tolerates low light",
                "18-24°C, dry environment",
                "Well-drained soil, standard mix",
            ],
        ),
        plant(
            "Baby Rubber Plant",
            "Peperomia obtusifolia",
            "Small plant with fleshy, glossy leaves, perfect for small spaces.",
            C::Succulent,
            L::Round,
            [
                "Water sparingly, when the soil is dry",
                "Bright indirect light",
                "18-24°C, dry environment",
                "Well-drained soil, avoid excess moisture",
            ],
        ),
        plant(
            "Prayer Plant",
            "Maranta leuconeura",
            "Plant with decorative leaves that fold up at night.",
            C::Ornamental,
            L::Oval,
            [
                "Keep the soil moist, use filtered water",
                "Medium indirect light, avoid direct sun",
                "20-25°C, high humidity",
                "Moist, well-drained soil",
            ],
        ),
        // Flowers and garden plants
        plant(
            "Rose",
            "Rosa sp.",
            "Classic fragrant flower, a symbol of love and beauty. Needs specific care.",
            C::Flowering,
            L::Serrated,
            [
                "Water at the base of the plant, avoid wetting the leaves",
                "Direct morning sun, at least 6 hours of light",
                "15-25°C, protect from frost",
                "Rich, well-drained, slightly acidic soil",
            ],
        ),
        plant(
            "African Violet",
            "Saintpaulia ionantha",
            "Small plant with colorful flowers and velvety leaves. Popular indoors.",
            C::Flowering,
            L::Round,
            [
                "Use lukewarm water, water from below to keep leaves dry",
                "Bright indirect light, avoid direct sun",
                "18-24°C, stable environment",
                "Light, well-drained violet mix",
            ],
        ),
        plant(
            "Sunflower",
            "Helianthus annuus",
            "Large yellow flower that tracks the sun. Annual garden plant.",
            C::Flowering,
            L::Heart,
            [
                "Water regularly, especially while growing",
                "Direct sun, at least 8 hours a day",
                "20-30°C, heat tolerant",
                "Well-drained, nutrient-rich soil",
            ],
        ),
        plant(
            "Moth Orchid",
            "Phalaenopsis amabilis",
            "Elegant orchid with long-lasting flowers, popular indoors.",
            C::Orchid,
            L::Oval,
            [
                "Water once a week and let it drain well",
                "Bright indirect light, no direct sun",
                "18-25°C, good ventilation",
                "Orchid-specific substrate",
            ],
        ),
        plant(
            "Wax Begonia",
            "Begonia semperflorens",
            "Colorful, delicate flower for gardens and pots. Blooms continuously.",
            C::Flowering,
            L::Round,
            [
                "Keep the soil moist but not soggy",
                "Indirect light or gentle morning sun",
                "18-24°C, protect from cold",
                "Rich, well-drained soil",
            ],
        ),
        // Aromatic herbs
        plant(
            "Basil",
            "Ocimum basilicum",
            "Aromatic herb widely used in cooking, easy to grow.",
            C::Aromatic,
            L::Oval,
            [
                "Water regularly, keep the soil moist",
                "Direct sun, 4-6 hours a day",
                "20-25°C, protect from cold",
                "Rich, well-drained soil",
            ],
        ),
        plant(
            "Rosemary",
            "Rosmarinus officinalis",
            "Hardy Mediterranean herb with a strong aroma and medicinal properties.",
            C::Aromatic,
            L::Needle,
            [
                "Water sparingly, let the soil dry between waterings",
                "Direct sun, many hours of light",
                "15-25°C, heat tolerant",
                "Well-drained soil, can be poor",
            ],
        ),
        plant(
            "Spearmint",
            "Mentha spicata",
            "Refreshing aromatic herb that grows fast and spreads easily.",
            C::Aromatic,
            L::Serrated,
            [
                "Keep the soil moist, likes water",
                "Direct sun or partial shade",
                "15-25°C, hardy",
                "Moist, fertile soil",
            ],
        ),
        plant(
            "Lavender",
            "Lavandula angustifolia",
            "Aromatic plant with purple flowers, known for its relaxing properties.",
            C::Aromatic,
            L::Long,
            [
                "Water sparingly, prefers drier soil",
                "Direct sun, many hours of light",
                "15-25°C, cold tolerant",
                "Well-drained, alkaline soil",
            ],
        ),
        // Succulents and cacti
        plant(
            "Mexican Snowball",
            "Echeveria elegans",
            "Rosette-shaped succulent with fleshy blue-grey leaves.",
            C::Succulent,
            L::Fleshy,
            [
                "Water rarely, only when the soil is dry",
                "Direct sun or strong light",
                "15-25°C, hardy",
                "Sandy, very well-drained soil",
            ],
        ),
        plant(
            "San Pedro Cactus",
            "Echinopsis pachanoi",
            "Fast-growing columnar cactus native to the Andes.",
            C::Cactus,
            L::Spine,
            [
                "Water very little, especially in winter",
                "Direct sun, lots of light",
                "15-30°C, tolerant of swings",
                "Sandy soil with excellent drainage",
            ],
        ),
        plant(
            "Jade Plant",
            "Crassula ovata",
            "Succulent with fleshy, glossy leaves, a symbol of prosperity.",
            C::Succulent,
            L::Fleshy,
            [
                "Water sparingly, let the soil dry out completely",
                "Direct sun or strong light",
                "18-24°C, adapts well",
                "Well-drained soil, cactus mix",
            ],
        ),
        // Trees and shrubs
        plant(
            "Weeping Fig",
            "Ficus benjamina",
            "Popular indoor tree with small, glossy leaves.",
            C::Tree,
            L::Oval,
            [
                "Water when the top of the soil is dry",
                "Bright indirect light",
                "18-25°C, avoid drafts",
                "Well-drained, fertile soil",
            ],
        ),
        plant(
            "Azalea",
            "Rhododendron simsii",
            "Flowering shrub with showy blooms in many colors.",
            C::Shrub,
            L::Oval,
            [
                "Keep the soil moist, use filtered water",
                "Indirect light or morning sun",
                "15-20°C, prefers a cool climate",
                "Acidic, well-drained soil",
            ],
        ),
        // Aquatic plants
        plant(
            "White Water Lily",
            "Nymphaea alba",
            "Aquatic plant with floating flowers, ideal for ponds and tanks.",
            C::Aquatic,
            L::Round,
            [
                "Lives in water, keep the level constant",
                "Direct sun, 6+ hours a day",
                "20-25°C, warm water",
                "Rich aquatic substrate",
            ],
        ),
        // Ferns
        plant(
            "Boston Fern",
            "Nephrolepis exaltata",
            "Plant with delicate, drooping fronds, ideal for humid rooms.",
            C::Fern,
            L::Lobed,
            [
                "Keep the soil moist at all times",
                "Indirect light, avoid direct sun",
                "18-24°C, high humidity",
                "Moist soil rich in organic matter",
            ],
        ),
        plant(
            "Maidenhair Fern",
            "Adiantum capillus-veneris",
            "Delicate fern with fine fronds, very decorative.",
            C::Fern,
            L::Lobed,
            [
                "Soil always moist, mist the leaves",
                "Soft indirect light, shade",
                "18-22°C, high humidity",
                "Moist, well-drained soil",
            ],
        ),
        // Carnivorous plants
        plant(
            "Venus Flytrap",
            "Dionaea muscipula",
            "Carnivorous plant famous for the traps that catch insects.",
            C::Carnivorous,
            L::Trap,
            [
                "Use distilled water, keep a saucer with water",
                "Direct sun or very strong light",
                "20-30°C in summer, 5-15°C in winter",
                "Nutrient-poor substrate, sphagnum moss",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_populated() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 28);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Catalog::new(Vec::new()).unwrap_err();
        assert!(matches!(err, PlantVisionError::Config(_)));
    }

    #[test]
    fn test_every_extractable_category_has_records() {
        let catalog = Catalog::builtin();
        for category in &PlantCategory::ALL[..7] {
            assert!(
                !catalog.by_category(*category).is_empty(),
                "no plants for {}",
                category
            );
        }
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Fern".parse::<PlantCategory>().unwrap(), PlantCategory::Fern);
        assert_eq!(" cactus ".parse::<PlantCategory>().unwrap(), PlantCategory::Cactus);
        assert!("mushroom".parse::<PlantCategory>().is_err());
    }

    #[test]
    fn test_catalog_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let records = Catalog::builtin().records()[..3].to_vec();
        std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

        let catalog = Catalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.records(), &records[..]);
    }

    #[test]
    fn test_catalog_json_file_empty_array_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(
            Catalog::from_json_file(&path),
            Err(PlantVisionError::Config(_))
        ));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(&Catalog::builtin().records()[0]).unwrap();
        assert_eq!(json["commonName"], "Golden Pothos");
        assert_eq!(json["leafShape"], "heart");
        assert_eq!(json["category"], "climber");
    }
}
