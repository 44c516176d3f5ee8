//! One play-through of a level.
//!
//! Rounds auto-advance: every question is answered exactly once, right or
//! wrong, and the reward is based on the cumulative number of correct answers.

use thiserror::Error;

use super::game_store::GameStore;
use crate::models::attempt::RecordAttemptRequest;
use crate::models::level::{find_level, next_level, LevelId};
use crate::models::question::Question;

/// Upper bound of questions fetched for one round.
pub const QUESTIONS_PER_ROUND: u32 = 10;

const GEARS_PER_ROUND: u32 = 1;
const MIN_COINS_PER_ROUND: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("No questions available for level {0}")]
    NoQuestions(LevelId),

    #[error("Round is already finished")]
    Finished,

    #[error("Answer {index} does not exist, question has {count} answers")]
    NoSuchAnswer { index: usize, count: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    /// Record to post to the question store
    pub attempt: RecordAttemptRequest,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReward {
    pub level: LevelId,
    pub correct: u32,
    pub total: u32,
    pub coins: u32,
    pub gears: u32,
    pub unlocks: Option<LevelId>,
}

impl RoundReward {
    /// Credits the reward and records the level score.
    pub fn apply(&self, store: &mut GameStore) {
        store.add_gears(self.gears);
        store.add_coins(self.coins);
        if let Some(level) = self.unlocks {
            store.unlock_level(level);
        }
        store.save_level_score(self.level, self.correct, self.total);
        tracing::info!(
            "{} finished: {}/{} correct, +{} coins",
            find_level(self.level).map_or("Unknown level", |l| l.title),
            self.correct,
            self.total,
            self.coins
        );
    }
}

pub struct QuizRound {
    level: LevelId,
    questions: Vec<Question>,
    current: usize,
    correct: u32,
}

impl QuizRound {
    pub fn new(level: LevelId, questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions(level));
        }
        Ok(Self {
            level,
            questions,
            current: 0,
            correct: 0,
        })
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// 1-based number of the current question and the round length.
    pub fn progress(&self) -> (usize, usize) {
        (
            (self.current + 1).min(self.questions.len()),
            self.questions.len(),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Answers the current question by answer position and moves on.
    pub fn answer(&mut self, answer_index: usize) -> Result<AnswerOutcome, QuizError> {
        let question = self.current_question().ok_or(QuizError::Finished)?;
        let answer = question
            .answers
            .get(answer_index)
            .ok_or(QuizError::NoSuchAnswer {
                index: answer_index,
                count: question.answers.len(),
            })?;

        let is_correct = answer.is_correct;
        let attempt = RecordAttemptRequest {
            question_id: question.id.clone(),
            is_correct,
        };

        if is_correct {
            self.correct += 1;
        }
        self.current += 1;

        Ok(AnswerOutcome {
            is_correct,
            attempt,
            finished: self.is_finished(),
        })
    }

    /// Available once every question has been answered.
    pub fn reward(&self) -> Option<RoundReward> {
        if !self.is_finished() {
            return None;
        }
        Some(RoundReward {
            level: self.level,
            correct: self.correct,
            total: self.questions.len() as u32,
            coins: self.correct.max(MIN_COINS_PER_ROUND),
            gears: GEARS_PER_ROUND,
            unlocks: next_level(self.level).map(|l| l.id),
        })
    }
}
