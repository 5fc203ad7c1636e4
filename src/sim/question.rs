//! Multiple-choice arithmetic questions
//!
//! A question carries its prompt, the correct answer and four shuffled
//! options. Distractors are sampled without replacement from a finite
//! candidate pool, so generation always terminates.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{DISTRACTOR_SPREAD, OPTION_COUNT};

/// A quiz shown during an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    answer: i32,
    options: Vec<i32>,
}

impl Question {
    /// Build a question with `OPTION_COUNT` distinct positive options
    /// (the answer plus distractors close to it), in random order.
    pub fn generate(prompt: impl Into<String>, answer: i32, rng: &mut impl Rng) -> Self {
        let mut pool = distractor_pool(answer, OPTION_COUNT - 1);
        pool.shuffle(rng);

        let mut options = Vec::with_capacity(OPTION_COUNT);
        options.push(answer);
        options.extend(pool.into_iter().take(OPTION_COUNT - 1));
        options.shuffle(rng);

        Self {
            prompt: prompt.into(),
            answer,
            options,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> i32 {
        self.answer
    }

    pub fn options(&self) -> &[i32] {
        &self.options
    }

    /// Value of the option at `index`, if there is one
    pub fn option(&self, index: usize) -> Option<i32> {
        self.options.get(index).copied()
    }

    pub fn check_answer(&self, submitted: i32) -> bool {
        submitted == self.answer
    }
}

/// Positive candidates within `answer ± DISTRACTOR_SPREAD`, excluding the answer.
/// Widens upward past the window until at least `needed` values exist.
fn distractor_pool(answer: i32, needed: usize) -> Vec<i32> {
    let mut pool: Vec<i32> = (answer - DISTRACTOR_SPREAD..=answer + DISTRACTOR_SPREAD)
        .filter(|&v| v > 0 && v != answer)
        .collect();

    let mut next = (answer + DISTRACTOR_SPREAD + 1).max(1);
    while pool.len() < needed {
        if next != answer {
            pool.push(next);
        }
        next += 1;
    }
    pool
}
