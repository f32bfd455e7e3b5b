// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Synthesized health verdicts and care-tip annotation

use tracing::debug;

use super::features::ExtractedFeatures;
use crate::analysis::{CareTips, HealthStatus, TipSeverity};
use crate::random::RandomSource;

pub const ATTENTION_ISSUES: [&str; 6] = [
    "Slightly yellowed leaves",
    "Possible nutrient deficiency",
    "Signs of mild dehydration",
    "Slower growth than normal",
    "Some leaves dry at the tips",
    "Needs more humidity",
];

pub const CRITICAL_ISSUES: [&str; 6] = [
    "Pests detected on the leaves",
    "Signs of root rot",
    "Severely damaged leaves",
    "Significant discoloration",
    "Excessive leaf drop",
    "Possible fungal infection",
];

const OVERWATERING_CAUTION: &str = "Check that you are not overwatering.";
const WATERING_ACTION: &str = "Needs immediate attention!";
const LIGHTING_ACTION: &str = "May need to be repositioned.";

/// Outcome of the health check
#[derive(Debug, Clone, PartialEq)]
pub struct HealthVerdict {
    pub status: HealthStatus,
    pub issues: Vec<String>,
}

/// Chance of a healthy verdict given the image quality
pub fn health_probability(image_quality: f64) -> f64 {
    if image_quality > 0.8 {
        0.75
    } else if image_quality < 0.7 {
        0.45
    } else {
        0.6
    }
}

/// Draw a verdict: healthy below `p`, attention within the next 0.25, critical above
pub fn assess_health(features: &ExtractedFeatures, random: &dyn RandomSource) -> HealthVerdict {
    let r = random.next_f64();
    let p = health_probability(features.image_quality);

    let verdict = if r < p {
        HealthVerdict {
            status: HealthStatus::Healthy,
            issues: Vec::new(),
        }
    } else if r < p + 0.25 {
        HealthVerdict {
            status: HealthStatus::Attention,
            issues: draw_issues(&ATTENTION_ISSUES, random),
        }
    } else {
        HealthVerdict {
            status: HealthStatus::Critical,
            issues: draw_issues(&CRITICAL_ISSUES, random),
        }
    };

    debug!("Health draw r={:.3} p={:.2} -> {}", r, p, verdict.status);
    verdict
}

/// One or two picks from `list`, repeats dropped
fn draw_issues(list: &[&str], random: &dyn RandomSource) -> Vec<String> {
    let count = random.pick_index(2) + 1;
    let mut issues: Vec<String> = Vec::with_capacity(count);
    for _ in 0..count {
        let issue = list[random.pick_index(list.len())];
        if !issues.iter().any(|i| i == issue) {
            issues.push(issue.to_string());
        }
    }
    issues
}

/// Flag care tips according to the verdict
pub fn annotate_care_tips(tips: &mut CareTips, status: HealthStatus) {
    match status {
        HealthStatus::Healthy => {}
        HealthStatus::Attention => {
            tips.watering.flag(TipSeverity::Warning, OVERWATERING_CAUTION);
        }
        HealthStatus::Critical => {
            tips.watering.flag(TipSeverity::Urgent, WATERING_ACTION);
            tips.lighting.flag(TipSeverity::Urgent, LIGHTING_ACTION);
        }
    }
}
