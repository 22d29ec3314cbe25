use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{self, Catalog, SkillLevel};
use crate::quiz::{self, Quiz, QuizOutcome};

/// A run of lesson quizzes answered one after another with a running score.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    questions: Vec<quiz::Question>,
    current_question: usize,
    score: usize,
}

impl PracticeSession {
    /// Draws up to `count` distinct quizzes from topics at `skill_level`
    /// (every topic when `None`) and shuffles the options of each one.
    pub fn new<R: Rng + ?Sized>(
        catalog: &Catalog,
        skill_level: Option<SkillLevel>,
        count: usize,
        rng: &mut R,
    ) -> Self {
        let pool: Vec<&Quiz> = catalog::filter(catalog.topics(), "", skill_level)
            .into_iter()
            .flat_map(|topic| topic.lessons.iter().map(|lesson| &lesson.quiz))
            .collect();
        let chosen: Vec<&Quiz> = pool.choose_multiple(rng, count).copied().collect();
        debug!(
            "Practice session with {} of {} available quizzes",
            chosen.len(),
            pool.len()
        );

        let questions = chosen
            .into_iter()
            .map(|quiz| shuffled_question(quiz, rng))
            .collect();

        Self {
            questions,
            current_question: 0,
            score: 0,
        }
    }

    pub fn current(&self) -> Option<&quiz::Question> {
        self.questions.get(self.current_question)
    }

    /// Grades `selected_index` against the current question and moves on.
    /// Returns `None` once every question has been answered.
    pub fn answer(&mut self, selected_index: usize) -> Option<QuizOutcome> {
        let question = self.questions.get(self.current_question)?;
        let is_correct = question
            .answers
            .get(selected_index)
            .map_or(false, |answer| answer.is_correct);
        let explanation = question.explanation.clone();

        let outcome = if is_correct {
            self.score += 1;
            QuizOutcome::Correct { explanation }
        } else {
            let correct_answer = question
                .correct_answer()
                .map(|answer| answer.text.clone())
                .unwrap_or_default();
            QuizOutcome::Incorrect {
                correct_answer,
                explanation,
            }
        };
        self.current_question += 1;
        Some(outcome)
    }

    /// 1-based position of the current question, or of the next one past the end.
    pub fn current_number(&self) -> usize {
        self.current_question + 1
    }

    pub fn answered(&self) -> usize {
        self.current_question
    }

    pub fn questions(&self) -> &[quiz::Question] {
        &self.questions
    }

    pub fn is_finished(&self) -> bool {
        self.current_question >= self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn shuffled_question<R: Rng + ?Sized>(quiz: &Quiz, rng: &mut R) -> quiz::Question {
    // Shuffle so the correct option isn't always where the catalog put it
    let answers = {
        let mut shuffled_answers = quiz
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| quiz::Answer::new(option.clone(), i == quiz.correct_answer_index))
            .collect::<Vec<_>>();
        shuffled_answers.shuffle(rng);
        shuffled_answers
    };

    quiz::Question::new(quiz.question.clone(), answers, quiz.explanation.clone())
}

/// One lesson tip picked at random, for the "daily tip" card.
pub fn random_tip<'a, R: Rng + ?Sized>(catalog: &'a Catalog, rng: &mut R) -> Option<&'a str> {
    let tips: Vec<&str> = catalog
        .topics()
        .iter()
        .flat_map(|topic| topic.lessons.iter())
        .flat_map(|lesson| lesson.tips.iter().map(String::as_str))
        .collect();
    tips.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn builtin() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn session_never_repeats_a_quiz() {
        let catalog = builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let session = PracticeSession::new(&catalog, None, 50, &mut rng);

        assert_eq!(session.len(), 11);
        let distinct: HashSet<&str> = session.questions().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(distinct.len(), session.len());
    }

    #[test]
    fn session_respects_skill_level() {
        let catalog = builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let session = PracticeSession::new(&catalog, Some(SkillLevel::Beginner), 10, &mut rng);

        let expected: HashSet<&str> = [
            "Which keyword is used for constants in Swift?",
            "What protocol must a SwiftUI view conform to?",
        ]
        .into_iter()
        .collect();
        let asked: HashSet<&str> = session.questions().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(asked, expected);
    }

    #[test]
    fn shuffled_options_keep_exactly_one_correct_answer() {
        let catalog = builtin();
        let mut rng = StdRng::seed_from_u64(42);
        let session = PracticeSession::new(&catalog, None, 11, &mut rng);

        for question in session.questions() {
            assert_eq!(question.answers.len(), 4);
            assert_eq!(question.answers.iter().filter(|a| a.is_correct).count(), 1);
        }
    }

    #[test]
    fn score_counts_correct_answers() {
        let catalog = builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = PracticeSession::new(&catalog, Some(SkillLevel::Intermediate), 3, &mut rng);
        assert_eq!(session.len(), 3);

        let mut expected_score = 0;
        for round in 0..session.len() {
            assert_eq!(session.current_number(), round + 1);
            let question = session.current().unwrap().clone();
            let correct_index = question.answers.iter().position(|a| a.is_correct).unwrap();
            // answer right on even rounds, wrong on odd ones
            let selected = if round % 2 == 0 {
                expected_score += 1;
                correct_index
            } else {
                (correct_index + 1) % question.answers.len()
            };
            let outcome = session.answer(selected).unwrap();
            assert_eq!(outcome.is_correct(), round % 2 == 0);
            assert_eq!(outcome.explanation(), question.explanation);
        }

        assert!(session.is_finished());
        assert_eq!(session.answered(), 3);
        assert_eq!(session.score(), expected_score);
        assert!(session.answer(0).is_none());
    }

    #[test]
    fn random_tip_comes_from_a_lesson() {
        let catalog = builtin();
        let mut rng = StdRng::seed_from_u64(9);
        let tip = random_tip(&catalog, &mut rng).unwrap();
        assert!(catalog
            .topics()
            .iter()
            .flat_map(|topic| topic.lessons.iter())
            .any(|lesson| lesson.tips.iter().any(|t| t == tip)));
    }
}
