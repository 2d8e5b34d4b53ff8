use crate::{
    schemas::CompletionSchema,
    types::{Itinerary, TripPreferences},
};

pub const ITINERARY_SYSTEM_PROMPT: &str = "You are an expert India travel planner. Create detailed, practical and culturally authentic itineraries. \
For every activity include a time-of-day label, what to do, a cost estimate in INR with a USD equivalent, \
a safety note and a cultural etiquette note. Recommend local restaurants and street food, transport tips and hidden gems.";

pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a professional translator specialising in Indian languages. \
Provide accurate translations that preserve meaning, tone and cultural context. Also include:\n\
- Transliteration (if the target script is different)\n\
- Brief pronunciation guide\n\
- Any cultural notes if relevant";

pub const CULTURAL_GUIDE_SYSTEM_PROMPT: &str = "You are a friendly cultural etiquette guide for visitors to India. \
Answer questions about dress codes, greetings, tipping, dining manners, bargaining, religious sites, photography and common scams. \
Be specific, respectful of regional differences and concise. Use short bullet points where they help.";

/// Returns `(system_prompt, prompt)` for a structured itinerary request.
pub fn itinerary_prompt(preferences: &TripPreferences) -> (String, String) {
    let interests = if preferences.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        preferences.interests.join(", ")
    };

    let schema = Itinerary::schema();
    let prompt = format!(
        "Create a {days}-day travel itinerary for {city}, India.\n\
         Travel Style: {style}\n\
         Interests: {interests}\n\
         Budget: {budget}\n\n\
         Respond with ONLY a JSON document, no prose and no Markdown, that matches this `{name}` JSON schema:\n\
         {schema_json}\n\n\
         Include exactly {days} entries in `days`, numbered from 1.",
        days = preferences.days,
        city = preferences.display_city(),
        style = preferences.travel_style,
        budget = preferences.budget,
        name = schema.schema_name(),
        schema_json = schema.prompt_schema(),
    );

    (ITINERARY_SYSTEM_PROMPT.to_string(), prompt)
}

/// Returns `(system_prompt, prompt)` for a translation request.
pub fn translation_prompt(text: &str, target_language: &str) -> (String, String) {
    let prompt = format!(
        "Translate the following text to {target_language}:\n\n\"{text}\"\n\n\
         Provide the translation, transliteration, and pronunciation guide."
    );
    (TRANSLATION_SYSTEM_PROMPT.to_string(), prompt)
}
