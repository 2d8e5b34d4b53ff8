use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Day-by-day India trip itinerary produced by the itinerary template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[completion_schema]
pub struct Itinerary {
    /// One entry per day, in travel order
    pub days: Vec<DayPlan>,
    /// Estimated cost of the whole trip, e.g. "₹45,000 (~$540)"
    pub estimated_total_cost: String,
    /// General tips that apply to the whole trip
    #[serde(default)]
    pub tips: Vec<String>,
}

/// Activities planned for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day counter within the itinerary
    pub day: u32,
    /// Short theme for the day, e.g. "Old Delhi heritage walk"
    pub label: String,
    /// Activities in chronological order
    pub activities: Vec<Activity>,
}

/// A single stop or experience within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Time-of-day label such as "Morning" or "09:00"
    pub time: String,
    /// What to do and where
    pub description: String,
    /// Cost estimate in INR with a USD equivalent
    pub cost: String,
    /// Practical safety advice for this activity
    pub safety_note: String,
    /// Local etiquette or cultural context worth knowing
    pub cultural_note: String,
}

impl Itinerary {
    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }
}
