// ABOUTME: Server-authoritative user profile and the partial-update payload
// ABOUTME: UserProfile fetch shape plus ProfileUpdate with omit-if-absent semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use serde::{Deserialize, Serialize};

use super::recommendation::HealthRecommendation;
use super::snapshot::HealthSnapshot;

/// Server-authoritative identity and demographic record.
///
/// `user_id` is stable and never reassigned. The `recommendations` list is
/// refreshed wholesale on each fetch; the client only ever replaces it with a
/// reconciled copy via [`UserProfile::with_recommendations`], never patches it
/// incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable user identifier
    pub user_id: i64,
    /// Given name
    #[serde(default)]
    pub name: Option<String>,
    /// Family name
    #[serde(default)]
    pub surname: Option<String>,
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u32>,
    /// Biological sex
    #[serde(default)]
    pub gender: Option<String>,
    /// Height (cm)
    #[serde(default)]
    pub height: Option<f64>,
    /// Body mass (kg)
    #[serde(default)]
    pub weight: Option<f64>,
    /// Server-issued recommendations, refreshed wholesale on each fetch
    #[serde(default)]
    pub recommendations: Option<Vec<HealthRecommendation>>,
}

impl UserProfile {
    /// Replace the recommendation list with a reconciled copy.
    #[must_use]
    pub fn with_recommendations(mut self, recommendations: Vec<HealthRecommendation>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }
}

/// Partial-update body for `PUT /users/{id}`.
///
/// `None` fields are omitted from the JSON entirely so they cannot overwrite
/// server values with null; "field not provided" and "field explicitly
/// cleared" are therefore distinct on the wire (the client never clears).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Age in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Body mass (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Height (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Biological sex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ProfileUpdate {
    /// Extract the demographic fields a snapshot happens to carry.
    #[must_use]
    pub fn from_snapshot(snapshot: &HealthSnapshot) -> Self {
        Self {
            age: snapshot.age,
            weight: snapshot.weight,
            height: snapshot.height,
            gender: snapshot.gender.clone(),
        }
    }

    /// Whether there is anything to push at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.age.is_none() && self.weight.is_none() && self.height.is_none() && self.gender.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_are_omitted_not_null() {
        let update = ProfileUpdate {
            age: Some(34),
            weight: None,
            height: None,
            gender: Some("female".into()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["age"], 34);
        assert_eq!(json["gender"], "female");
        assert!(json.get("weight").is_none());
        assert!(json.get("height").is_none());
    }

    #[test]
    fn profile_tolerates_missing_optional_fields() {
        let profile: UserProfile = serde_json::from_str(r#"{"userId": 12}"#).unwrap();
        assert_eq!(profile.user_id, 12);
        assert!(profile.name.is_none());
        assert!(profile.recommendations.is_none());
    }
}
