use crate::llm_client::prompts::{localize, Locale, RAW_JSON_ARRAY_RULE};
use crate::models::user::UserProfile;

/// Used when the caller gives no extra details.
pub const DEFAULT_EXTRA_INFO: &str = "I want to explore the best options.";

/// Replace: {occupation}, {interests}, {experience_level}, {extra_info}, {json_rule}
pub const CAREER_PLAN_PROMPT_TEMPLATE: &str = r#"Create a step-by-step career plan for a user with the following profile:
Occupation: {occupation}
Interests: {interests}
Experience Level: {experience_level} out of 5 stars.
Extra details: {extra_info}

Each element of the array is one step of a roadmap and must have exactly these keys:
"step_number": integer, starting at 1
"title": short string title for the node
"description": 1 short sentence maximum (keep it extremely brief, under 15 words)
"timeframe": short duration string (e.g. "1 wk", "2 mos")
"type": one of "milestone" | "learning" | "project" | "job"

Make it 4 to 6 steps long.
{json_rule}"#;

pub fn build_career_plan_prompt(user: &UserProfile, extra_info: &str, locale: Locale) -> String {
    let occupation = if user.occupation.trim().is_empty() {
        "Not specified"
    } else {
        user.occupation.trim()
    };
    let interests = if user.interests.is_empty() {
        "Not specified".to_string()
    } else {
        user.interests.join(", ")
    };
    let extra_info = if extra_info.trim().is_empty() {
        DEFAULT_EXTRA_INFO
    } else {
        extra_info.trim()
    };

    // User-supplied values go in last so their text is never rescanned.
    let prompt = CAREER_PLAN_PROMPT_TEMPLATE
        .replace("{json_rule}", RAW_JSON_ARRAY_RULE)
        .replace("{experience_level}", &user.experience_level.to_string())
        .replace("{interests}", &interests)
        .replace("{occupation}", occupation)
        .replace("{extra_info}", extra_info);
    localize(prompt, locale)
}
