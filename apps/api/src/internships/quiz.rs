//! Certification quiz: fetch (stored → shared cache → generate) and scoring.
//!
//! Answer keys never leave the server; `QuizView` carries only question
//! text and options.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{quiz_key, read_json, write_json, SharedCache};
use crate::errors::AppError;
use crate::internships::prompts::build_quiz_prompt;
use crate::llm_client::parser::ParseError;
use crate::llm_client::{generate_records, ContentKind, ContentRequest, TextGenerator};
use crate::models::internship::{EnrollmentStatus, InternshipRow, QuestionSet, QuizQuestion};
use crate::store::{require_internship, Store};

pub const QUIZ_LENGTH: usize = 10;
pub const PASS_MARK: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub questions: Vec<PublicQuestion>,
    pub total: usize,
}

impl QuizView {
    fn from_questions(questions: &[QuizQuestion]) -> Self {
        Self {
            questions: questions
                .iter()
                .map(|q| PublicQuestion {
                    question: q.question.clone(),
                    options: q.options.clone(),
                })
                .collect(),
            total: questions.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerResult {
    pub question_index: usize,
    pub user_answer: i64,
    pub correct_answer: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizScore {
    pub score: u32,
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
    pub results: Vec<AnswerResult>,
}

impl QuizScore {
    pub fn summary(&self) -> String {
        format!(
            "Quiz Result: {}/{} correct ({}%). {}",
            self.correct,
            self.total,
            self.score,
            if self.passed { "PASSED" } else { "FAILED" }
        )
    }
}

/// Scores `answers` positionally. Missing or out-of-range answers count as
/// wrong; extra answers are ignored.
pub fn score_answers(questions: &[QuizQuestion], answers: &[i64]) -> QuizScore {
    let results: Vec<AnswerResult> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let user_answer = answers.get(index).copied().unwrap_or(-1);
            AnswerResult {
                question_index: index,
                user_answer,
                correct_answer: question.correct,
                is_correct: user_answer >= 0 && user_answer as usize == question.correct,
            }
        })
        .collect();

    let total = questions.len();
    let correct = results.iter().filter(|r| r.is_correct).count();
    let score = if total == 0 {
        0
    } else {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    };

    QuizScore {
        score,
        correct,
        total,
        passed: score >= PASS_MARK,
        results,
    }
}

/// Returns the internship's quiz, generating and caching it on first use.
pub async fn get_quiz(
    store: &dyn Store,
    cache: &dyn SharedCache,
    llm: &dyn TextGenerator,
    internship_id: Uuid,
) -> Result<QuizView, AppError> {
    let internship = require_internship(store, internship_id).await?;
    if let Some(stored) = internship.questions.0.quiz(QUIZ_LENGTH) {
        return Ok(QuizView::from_questions(stored));
    }

    let questions = shared_or_generated(cache, llm, &internship).await?;
    store
        .set_internship_questions(internship_id, &QuestionSet::Quiz(questions.clone()))
        .await?;
    Ok(QuizView::from_questions(&questions))
}

async fn shared_or_generated(
    cache: &dyn SharedCache,
    llm: &dyn TextGenerator,
    internship: &InternshipRow,
) -> Result<Vec<QuizQuestion>, AppError> {
    let key = quiz_key(&internship.title);
    if let Some(cached) = read_json::<Vec<QuizQuestion>>(cache, &key).await {
        if !cached.is_empty() && cached.iter().all(QuizQuestion::is_well_formed) {
            info!("Quiz cache hit for {key}");
            return Ok(cached);
        }
        warn!("Ignoring malformed cached quiz under {key}");
    }

    let request = ContentRequest::new(
        ContentKind::Quiz,
        internship.title.clone(),
        build_quiz_prompt(&internship.title, &internship.skills_learned),
    );
    let generated = generate_records::<QuizQuestion>(llm, &request).await?;
    let mut questions: Vec<QuizQuestion> = generated
        .into_iter()
        .filter(QuizQuestion::is_well_formed)
        .collect();
    if questions.is_empty() {
        return Err(ParseError::Empty.into());
    }
    questions.truncate(QUIZ_LENGTH);

    write_json(cache, &key, &questions).await;
    info!(
        "Generated {} quiz questions for internship {}",
        questions.len(),
        internship.id
    );
    Ok(questions)
}

/// Scores a submission against the stored quiz and records the result on
/// the enrollment. A pass marks the enrollment `Graded`.
pub async fn submit_quiz(
    store: &dyn Store,
    user_id: Uuid,
    internship_id: Uuid,
    answers: &[i64],
) -> Result<QuizScore, AppError> {
    let internship = require_internship(store, internship_id).await?;
    let questions = match internship.questions.0.quiz(1) {
        Some(questions) => questions,
        None => {
            return Err(AppError::Validation(
                "No quiz found. Generate one first.".to_string(),
            ))
        }
    };

    let result = score_answers(questions, answers);

    let mut enrollment = store.get_or_create_enrollment(user_id, internship_id).await?;
    enrollment.ai_score = Some(result.score as i32);
    enrollment.ai_feedback = result.summary();
    if result.passed {
        enrollment.set_status(EnrollmentStatus::Graded);
    }
    store.save_enrollment(&enrollment).await?;

    info!(
        "User {user_id} scored {}% on quiz for internship {internship_id}",
        result.score
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::models::internship::NewInternship;
    use crate::store::memory::MemoryStore;
    use crate::testing::ScriptedGenerator;

    fn question(n: usize, correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: format!("Question {n}?"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
        }
    }

    fn ten_questions() -> Vec<QuizQuestion> {
        (0..QUIZ_LENGTH).map(|n| question(n, n % 4)).collect()
    }

    async fn seeded(store: &MemoryStore, user_id: Uuid, title: &str, questions: QuestionSet) -> Uuid {
        store
            .insert_internship(NewInternship {
                user_id,
                title: title.into(),
                image_url: String::new(),
                min_days: 7,
                max_days: 14,
                description: String::new(),
                skills_learned: "SQL".into(),
                ai_generated_text: String::new(),
                resource_links: vec![],
                questions,
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_six_of_ten_passes() {
        let questions = ten_questions();
        let mut answers: Vec<i64> = questions.iter().map(|q| q.correct as i64).collect();
        for answer in answers.iter_mut().take(4) {
            *answer = (*answer + 1) % 4;
        }

        let score = score_answers(&questions, &answers);
        assert_eq!(score.correct, 6);
        assert_eq!(score.score, 60);
        assert!(score.passed);
        assert!(!score.results[0].is_correct);
        assert!(score.results[9].is_correct);
    }

    #[test]
    fn test_missing_and_negative_answers_are_wrong() {
        let questions = vec![question(0, 0), question(1, 1), question(2, 2)];
        let score = score_answers(&questions, &[-1, 1]);
        assert_eq!(score.correct, 1);
        assert_eq!(score.score, 33);
        assert!(!score.passed);
        assert_eq!(score.results[2].user_answer, -1);
    }

    #[tokio::test]
    async fn test_generates_caches_and_hides_answers() {
        let store = MemoryStore::new();
        let cache = MemoryCache::default();
        let user_id = Uuid::new_v4();
        let id = seeded(&store, user_id, "SQL Basics", QuestionSet::default()).await;
        let payload = serde_json::to_string(&ten_questions()).unwrap();
        let llm = ScriptedGenerator::replying(&payload);

        let view = get_quiz(&store, &cache, &llm, id).await.unwrap();

        assert_eq!(view.total, QUIZ_LENGTH);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["questions"][0].get("correct").is_none());
        assert!(cache.get(&quiz_key("SQL Basics")).await.is_some());
        let stored = store.get_internship(id).await.unwrap().unwrap();
        assert_eq!(stored.questions.0.quiz(QUIZ_LENGTH).map(|q| q.len()), Some(10));
    }

    #[tokio::test]
    async fn test_shared_cache_hit_skips_generation() {
        let store = MemoryStore::new();
        let cache = MemoryCache::default();
        write_json(&cache, &quiz_key("SQL Basics"), &ten_questions()).await;
        let id = seeded(&store, Uuid::new_v4(), "sql basics", QuestionSet::default()).await;
        let llm = ScriptedGenerator::default();

        let view = get_quiz(&store, &cache, &llm, id).await.unwrap();

        assert_eq!(view.total, QUIZ_LENGTH);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_stored_quiz_is_reused() {
        let store = MemoryStore::new();
        let cache = MemoryCache::default();
        let id = seeded(
            &store,
            Uuid::new_v4(),
            "Rust",
            QuestionSet::Quiz(ten_questions()),
        )
        .await;
        let llm = ScriptedGenerator::default();

        get_quiz(&store, &cache, &llm, id).await.unwrap();
        assert_eq!(llm.calls(), 0);
        assert!(cache.get(&quiz_key("Rust")).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_questions_are_dropped() {
        let store = MemoryStore::new();
        let cache = MemoryCache::default();
        let id = seeded(&store, Uuid::new_v4(), "Go", QuestionSet::default()).await;
        let llm = ScriptedGenerator::replying(
            r#"[{"question": "Q1", "options": ["a","b","c","d"], "correct": 2},
                {"question": "Q2", "options": ["a","b"], "correct": 0},
                {"question": "Q3", "options": ["a","b","c","d"], "correct": 7}]"#,
        );

        let view = get_quiz(&store, &cache, &llm, id).await.unwrap();
        assert_eq!(view.total, 1);
        assert_eq!(view.questions[0].question, "Q1");
    }

    #[tokio::test]
    async fn test_submit_requires_a_quiz() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let id = seeded(
            &store,
            user_id,
            "Rust",
            QuestionSet::Interview(vec!["Why?".into()]),
        )
        .await;

        let err = submit_quiz(&store, user_id, id, &[0, 1]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("No quiz found")));
    }

    #[tokio::test]
    async fn test_submit_records_result_on_enrollment() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let id = seeded(&store, user_id, "Rust", QuestionSet::Quiz(ten_questions())).await;

        let answers: Vec<i64> = ten_questions().iter().map(|q| q.correct as i64).collect();
        let passed = submit_quiz(&store, user_id, id, &answers).await.unwrap();
        assert_eq!(passed.score, 100);

        let enrollment = store.find_enrollment(user_id, id).await.unwrap().unwrap();
        assert!(enrollment.is_graded());
        assert_eq!(enrollment.ai_score, Some(100));
        assert!(enrollment.ai_feedback.contains("PASSED"));
    }

    #[tokio::test]
    async fn test_failed_quiz_keeps_enrolled_status() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let id = seeded(&store, user_id, "Rust", QuestionSet::Quiz(ten_questions())).await;

        let failed = submit_quiz(&store, user_id, id, &[]).await.unwrap();
        assert_eq!(failed.score, 0);

        let enrollment = store.find_enrollment(user_id, id).await.unwrap().unwrap();
        assert!(!enrollment.is_graded());
        assert!(enrollment.ai_feedback.contains("FAILED"));
    }
}
