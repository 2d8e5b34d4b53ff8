use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

pub const MAX_TRIP_DAYS: u32 = 30;

/// Inputs collected by the multi-step trip form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPreferences {
    pub city: String,
    pub days: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    pub budget: String,
    pub travel_style: String,
}

impl TripPreferences {
    pub fn new(city: impl Into<String>, days: u32) -> Self {
        Self {
            city: city.into(),
            days,
            interests: Vec::new(),
            budget: "moderate".to_string(),
            travel_style: "balanced".to_string(),
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    pub fn with_travel_style(mut self, travel_style: impl Into<String>) -> Self {
        self.travel_style = travel_style.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() {
            return Err(RelayError::InvalidRequest(
                "A destination city is required".to_string(),
            ));
        }
        if self.days == 0 || self.days > MAX_TRIP_DAYS {
            return Err(RelayError::InvalidRequest(format!(
                "Trip length must be between 1 and {MAX_TRIP_DAYS} days, got {}",
                self.days
            )));
        }
        Ok(())
    }

    /// Form values arrive as slugs ("new-delhi"); the prompt wants "New Delhi".
    pub fn display_city(&self) -> String {
        self.city
            .trim()
            .split(['-', '_', ' '])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_slug_is_prettified() {
        assert_eq!(TripPreferences::new("new-delhi", 3).display_city(), "New Delhi");
        assert_eq!(TripPreferences::new("jaipur", 3).display_city(), "Jaipur");
    }

    #[test]
    fn day_bounds_are_enforced() {
        assert!(TripPreferences::new("goa", 0).validate().is_err());
        assert!(TripPreferences::new("goa", 31).validate().is_err());
        assert!(TripPreferences::new("goa", 30).validate().is_ok());
        assert!(TripPreferences::new("  ", 2).validate().is_err());
    }
}
