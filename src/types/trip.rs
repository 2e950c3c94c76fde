use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Trip parameters submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    /// Trip length in days
    pub duration: u32,
    pub travelers: u32,
    pub interests: Vec<String>,
    /// Per-person budget, currency-agnostic positive amount
    pub budget: u64,
}

impl TripRequest {
    /// Validate field-level invariants before any prompt is built.
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(ApiError::Input("destination must not be empty".to_string()));
        }
        if self.duration < 1 {
            return Err(ApiError::Input("duration must be at least 1 day".to_string()));
        }
        if self.travelers < 1 {
            return Err(ApiError::Input("travelers must be at least 1".to_string()));
        }
        if self.budget < 1 {
            return Err(ApiError::Input("budget must be a positive amount".to_string()));
        }
        if self.interests.iter().any(|i| i.trim().is_empty()) {
            return Err(ApiError::Input(
                "interest tags must be non-empty strings".to_string(),
            ));
        }

        // Dates are accepted as free-form strings, but when both parse as
        // YYYY-MM-DD the duration must agree with the span they cover.
        if let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d"),
            NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d"),
        ) {
            let span = (end - start).num_days() + 1;
            if span < 1 {
                return Err(ApiError::Input(
                    "endDate must not be before startDate".to_string(),
                ));
            }
            if span != i64::from(self.duration) {
                return Err(ApiError::Input(format!(
                    "duration ({} days) does not match the {}..{} date range ({} days)",
                    self.duration, self.start_date, self.end_date, span
                )));
            }
        }

        Ok(())
    }
}

/// Time-of-day slot an activity is scheduled in.
///
/// The generator is instructed to emit exactly these labels; lowercase
/// variants are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[serde(alias = "morning")]
    Morning,
    #[serde(alias = "afternoon")]
    Afternoon,
    #[serde(alias = "evening")]
    Evening,
    #[serde(alias = "night")]
    Night,
}

/// A single planned activity within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Free-form category tag (e.g. "foodie", "adventure")
    #[serde(rename = "type")]
    pub kind: String,
    pub time: TimeOfDay,
    pub title: String,
    pub description: String,
    pub image: String,
}

/// One day of the itinerary; activity order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based day number within the itinerary
    pub day: u32,
    pub title: String,
    pub summary: String,
    pub activities: Vec<Activity>,
}

/// Canonical itinerary shape returned to callers.
///
/// Constructed once per request from normalized generator output and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub title: String,
    pub days: Vec<DayPlan>,
    /// Estimated total cost; opaque non-negative integer with no derivable
    /// relation to per-activity spend.
    #[serde(rename = "totalCost")]
    pub total_cost: u64,
    #[serde(default)]
    pub image_url: Option<String>,
}
