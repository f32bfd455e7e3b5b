// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Analysis records: the unit stored in history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::CareGuide;

/// Overall plant health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Attention,
    Critical,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Attention => "Attention",
            HealthStatus::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// How urgently a care tip should be acted upon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipSeverity {
    #[default]
    Normal,
    Warning,
    Urgent,
}

/// A single care instruction with an optional health advisory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareTip {
    pub text: String,
    #[serde(default)]
    pub severity: TipSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

impl CareTip {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: TipSeverity::Normal,
            advisory: None,
        }
    }

    /// Raise severity and attach an advisory sentence
    pub fn flag(&mut self, severity: TipSeverity, advisory: &str) {
        self.severity = severity;
        self.advisory = Some(advisory.to_string());
    }
}

/// The four care tips attached to every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareTips {
    pub watering: CareTip,
    pub lighting: CareTip,
    pub temperature: CareTip,
    pub soil: CareTip,
}

impl From<&CareGuide> for CareTips {
    fn from(guide: &CareGuide) -> Self {
        Self {
            watering: CareTip::normal(&guide.watering),
            lighting: CareTip::normal(&guide.lighting),
            temperature: CareTip::normal(&guide.temperature),
            soil: CareTip::normal(&guide.soil),
        }
    }
}

impl CareTips {
    /// Tips in display order, labelled
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CareTip)> {
        [
            ("watering", &self.watering),
            ("lighting", &self.lighting),
            ("temperature", &self.temperature),
            ("soil", &self.soil),
        ]
        .into_iter()
    }
}

/// Result of analyzing one plant photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub health_status: HealthStatus,
    /// Confidence score (0.65 - 0.98)
    pub confidence: f64,
    pub care_tips: CareTips,
    /// Issues detected for non-healthy verdicts
    #[serde(default)]
    pub issues: Vec<String>,
    /// Original image as a data URI
    pub photo: String,
    pub timestamp: DateTime<Utc>,
}
