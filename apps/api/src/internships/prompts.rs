// Prompt templates for internship generation, grading and the quiz exam.

use crate::llm_client::prompts::{localize, Locale, RAW_JSON_ARRAY_RULE};

/// Replace: {occupation}, {json_rule}
pub const INTERNSHIP_SET_PROMPT_TEMPLATE: &str = r#"Create exactly 5 realistic, step-by-step mock internships for a user learning '{occupation}'.
Each element of the array must have these exact keys:
"title": string
"min_days": integer between 7 and 30
"max_days": integer between 7 and 30, not less than min_days
"description": string
"skills_learned": string
"ai_text": string, a short motivational intro
"youtube_search_term": string to search for a tutorial video
"questions": array of exactly 3 interview question strings
{json_rule}"#;

/// Replace: {title}, {skills}, {json_rule}
pub const QUIZ_PROMPT_TEMPLATE: &str = r#"Create exactly 10 multiple choice questions for a certification exam on "{title}".
Skills covered: {skills}

Each element of the array is one question object with these exact keys:
"question": the question text
"options": array of exactly 4 string choices
"correct": integer index of the correct option (0-3)

Make questions progressively harder. Mix theory and practical scenarios.
{json_rule}"#;

/// Replace: {repo_link}, {title}, {description}, {skills}
pub const GRADING_PROMPT_TEMPLATE: &str = r#"The user submitted a GitHub repository: {repo_link} for the project '{title}'.
Project description: {description}
Skills the project should demonstrate: {skills}

Provide a score out of 100 and brief feedback (2-3 sentences).
Respond with exactly two lines in this format and nothing else:
SCORE: <integer from 0 to 100>
FEEDBACK: <your feedback>"#;

pub fn build_internship_set_prompt(occupation: &str, locale: Locale) -> String {
    let prompt = INTERNSHIP_SET_PROMPT_TEMPLATE
        .replace("{occupation}", occupation)
        .replace("{json_rule}", RAW_JSON_ARRAY_RULE);
    localize(prompt, locale)
}

/// Quizzes are shared across users through the cache, so they are always
/// generated in the default language.
pub fn build_quiz_prompt(title: &str, skills: &str) -> String {
    let skills = if skills.trim().is_empty() {
        "General knowledge of the topic"
    } else {
        skills
    };
    QUIZ_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{skills}", skills)
        .replace("{json_rule}", RAW_JSON_ARRAY_RULE)
}

pub fn build_grading_prompt(
    repo_link: &str,
    title: &str,
    description: &str,
    skills: &str,
    locale: Locale,
) -> String {
    let prompt = GRADING_PROMPT_TEMPLATE
        .replace("{repo_link}", repo_link)
        .replace("{title}", title)
        .replace("{description}", description)
        .replace("{skills}", skills);
    localize(prompt, locale)
}
