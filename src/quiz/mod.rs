pub mod practice;

pub use practice::{random_tip, PracticeSession};

/// A single multiple-choice question attached to a lesson.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Quiz {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

impl Quiz {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer_index).map(String::as_str)
    }

    /// Out-of-range selections count as wrong answers.
    pub fn grade(&self, selected_index: usize) -> QuizOutcome {
        let correct_answer = self.correct_option().unwrap_or_default().to_string();
        let explanation = self.explanation.clone();
        if selected_index == self.correct_answer_index {
            QuizOutcome::Correct { explanation }
        } else {
            QuizOutcome::Incorrect {
                correct_answer,
                explanation,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Correct {
        explanation: String,
    },
    Incorrect {
        correct_answer: String,
        explanation: String,
    },
}

impl QuizOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, QuizOutcome::Correct { .. })
    }

    pub fn explanation(&self) -> &str {
        match self {
            QuizOutcome::Correct { explanation } | QuizOutcome::Incorrect { explanation, .. } => {
                explanation
            }
        }
    }
}

/// A quiz as presented during practice, with its options in display order.
#[derive(Debug, Clone)]
pub struct Question {
    pub text: String,
    pub answers: Vec<Answer>,
    pub explanation: String,
}
impl Question {
    pub fn new(text: String, answers: Vec<Answer>, explanation: String) -> Self {
        Self {
            text,
            answers,
            explanation,
        }
    }

    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|a| a.is_correct)
    }
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}
impl Answer {
    pub fn new(text: String, is_correct: bool) -> Self {
        Self { text, is_correct }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants_quiz() -> Quiz {
        Quiz {
            id: "constants-keyword".to_string(),
            question: "Which keyword is used for constants in Swift?".to_string(),
            options: ["var", "let", "const", "final"].map(String::from).to_vec(),
            correct_answer_index: 1,
            explanation: "The 'let' keyword is used to declare constants in Swift.".to_string(),
        }
    }

    #[test]
    fn grades_the_correct_option() {
        let outcome = constants_quiz().grade(1);
        assert!(outcome.is_correct());
        assert_eq!(
            outcome.explanation(),
            "The 'let' keyword is used to declare constants in Swift."
        );
    }

    #[test]
    fn wrong_option_reports_the_right_one() {
        match constants_quiz().grade(0) {
            QuizOutcome::Incorrect { correct_answer, .. } => assert_eq!(correct_answer, "let"),
            other => panic!("expected incorrect, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_selection_is_incorrect() {
        assert!(!constants_quiz().grade(17).is_correct());
    }
}
