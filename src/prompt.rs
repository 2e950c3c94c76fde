//! Prompt construction for the text-generation service.
//!
//! Both builders are pure: same input, same string. The target JSON shape is
//! spelled out literally so the model has no room to improvise field names.

use crate::types::TripRequest;

/// Literal description of the itinerary JSON the model must return.
const ITINERARY_JSON_SHAPE: &str = r#"{
  "title": "A string for the itinerary title",
  "days": [
    {
      "day": "An integer for the day number",
      "title": "A string for the day's theme or title",
      "summary": "A short string summary of the day",
      "activities": [
        {
          "type": "A string for the activity type (e.g., 'foodie', 'adventure')",
          "time": "Exactly one of 'Morning', 'Afternoon', 'Evening', 'Night'",
          "title": "A string for the activity title",
          "description": "A string describing the activity",
          "image": "A string URL for a placeholder image from 'https://placehold.co/100x100/...'"
        }
      ]
    }
  ],
  "totalCost": "An integer representing the total estimated cost in INR"
}"#;

/// Render a validated trip request into the itinerary-generation prompt.
pub fn itinerary_prompt(details: &TripRequest) -> String {
    let interests = details.interests.join(", ");

    format!(
        "You are an expert travel planner. Your task is to create a personalized travel \
         itinerary based on the user's preferences.\n\n\
         **User Preferences:**\n\
         - Source: {source}\n\
         - Destination: {destination}\n\
         - Travel dates: {start} to {end}\n\
         - Duration: {duration} days\n\
         - Number of Travelers: {travelers}\n\
         - Budget (per person): INR {budget}\n\
         - Interests: {interests}\n\n\
         **Your Task:**\n\
         1. Generate a creative, logical, and exciting day-by-day itinerary covering all \
         {duration} days.\n\
         2. The `totalCost` should be a realistic estimate in INR for the specified number \
         of travelers, considering the budget level.\n\
         3. For each activity, make the `description` detailed: suggest well-known local \
         eateries and famous dishes, mention typical visiting hours for attractions, and \
         include realistic hotel and flight suggestions where relevant.\n\
         4. For each activity, provide a relevant placeholder image URL from \
         `https://placehold.co/`. For example: `https://placehold.co/100x100/3498db/ffffff?text=Beach`.\n\
         5. The final output MUST be a single, valid JSON object that strictly follows this \
         structure. Do not include any text, explanations, or markdown formatting before or \
         after the JSON object.\n\n\
         **Required JSON Structure:**\n{shape}\n",
        source = details.source,
        destination = details.destination,
        start = details.start_date,
        end = details.end_date,
        duration = details.duration,
        travelers = details.travelers,
        budget = details.budget,
        interests = interests,
        shape = ITINERARY_JSON_SHAPE,
    )
}

/// Render the flight-listing prompt for the generative flight endpoint.
pub fn flight_listing_prompt(
    source_city: &str,
    destination_city: &str,
    travel_date: Option<&str>,
) -> String {
    format!(
        "Generate a JSON list of at least 3 flight options from {source_city} to \
         {destination_city}.\n\
         Travel date: {date}.\n\n\
         Each flight must have:\n\
         - airline: the operating airline name\n\
         - flight_number\n\
         - departure_time and arrival_time in 24-hour HH:MM format\n\
         - duration in total minutes as an integer\n\
         - stops: an integer number of stops\n\
         - price: an integer amount in INR\n\n\
         Output ONLY valid JSON. Do not add any text before or after.\n\
         JSON structure:\n\
         {{\n  \"flights\": [ {{ ... }} ]\n}}\n",
        date = travel_date.unwrap_or("any upcoming date"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TripRequest {
        TripRequest {
            source: "Mumbai".to_string(),
            destination: "Goa".to_string(),
            start_date: "2026-09-01".to_string(),
            end_date: "2026-09-03".to_string(),
            duration: 3,
            travelers: 2,
            interests: vec!["beach".to_string(), "street food".to_string()],
            budget: 20000,
        }
    }

    #[test]
    fn prompt_contains_parameters_verbatim() {
        let req = request();
        let prompt = itinerary_prompt(&req);
        assert!(prompt.contains("Goa"));
        assert!(prompt.contains("3 days"));
        for interest in &req.interests {
            assert!(prompt.contains(interest), "missing interest {interest}");
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let req = request();
        assert_eq!(itinerary_prompt(&req), itinerary_prompt(&req));
    }

    #[test]
    fn prompt_embeds_target_schema_and_json_only_instruction() {
        let prompt = itinerary_prompt(&request());
        assert!(prompt.contains("\"totalCost\""));
        assert!(prompt.contains("single, valid JSON object"));
    }

    #[test]
    fn flight_prompt_defaults_date() {
        let prompt = flight_listing_prompt("Bangalore", "Goa", None);
        assert!(prompt.contains("Bangalore"));
        assert!(prompt.contains("any upcoming date"));

        let dated = flight_listing_prompt("Bangalore", "Goa", Some("2026-10-01"));
        assert!(dated.contains("2026-10-01"));
    }
}
