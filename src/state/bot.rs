use crate::types::{Question, QuestionKind};
use rand::seq::IndexedRandom;
use rand::Rng;

/// A simulated opponent. Stateless: answering is a pure function of the
/// question, the skill level, and the RNG.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    pub name: String,
    /// 1-5, fixed at creation
    pub skill: u8,
}

impl SimulatedPlayer {
    pub fn new(name: impl Into<String>, skill: u8) -> Self {
        Self {
            name: name.into(),
            skill: skill.clamp(1, 5),
        }
    }

    /// Produce an answer for the question.
    ///
    /// Correctness probability is linear in skill within a per-kind range:
    /// FillBlank has the lowest ceiling (nothing to guess from), TrueFalse
    /// the highest (binary choice), MultipleChoice sits in between.
    pub fn answer(&self, question: &Question, rng: &mut impl Rng) -> String {
        if rng.random_bool(self.correct_chance(question.kind)) {
            return question.correct_answer.clone();
        }

        match question.kind {
            QuestionKind::MultipleChoice | QuestionKind::FillBlank => question
                .distractors
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| question.correct_answer.clone()),
            QuestionKind::TrueFalse => negate_true_false(question),
        }
    }

    fn correct_chance(&self, kind: QuestionKind) -> f64 {
        let skill = f64::from(self.skill);
        match kind {
            QuestionKind::MultipleChoice => 0.30 + (skill / 5.0) * 0.60,
            QuestionKind::TrueFalse => 0.40 + (skill / 5.0) * 0.50,
            QuestionKind::FillBlank => 0.20 + (skill / 5.0) * 0.50,
        }
    }
}

/// The wrong answer to a true/false question: the stored distractor when the
/// corpus provides one, otherwise the flip of the correct literal.
fn negate_true_false(question: &Question) -> String {
    if let Some(distractor) = question.distractors.first() {
        return distractor.clone();
    }
    if question.correct_answer.eq_ignore_ascii_case("true") {
        "False".to_string()
    } else {
        "True".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tf_question() -> Question {
        Question {
            kind: QuestionKind::TrueFalse,
            prompt: "Water is wet.".to_string(),
            correct_answer: "True".to_string(),
            distractors: Vec::new(),
            difficulty: 1,
            reference: None,
        }
    }

    fn mc_question() -> Question {
        Question {
            kind: QuestionKind::MultipleChoice,
            prompt: "Pick one".to_string(),
            correct_answer: "right".to_string(),
            distractors: vec!["wrong a".to_string(), "wrong b".to_string()],
            difficulty: 3,
            reference: None,
        }
    }

    fn correct_rate(player: &SimulatedPlayer, question: &Question, n: u32, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let hits = (0..n)
            .filter(|_| player.answer(question, &mut rng) == question.correct_answer)
            .count();
        hits as f64 / n as f64
    }

    #[test]
    fn skill_scales_true_false_accuracy() {
        let question = tf_question();
        let novice = SimulatedPlayer::new("AI-1", 1);
        let expert = SimulatedPlayer::new("AI-2", 5);

        let novice_rate = correct_rate(&novice, &question, 2_000, 11);
        let expert_rate = correct_rate(&expert, &question, 2_000, 11);

        // Design range is 0.40-0.90; with n=2000 the gap is far outside noise
        assert!(expert_rate > novice_rate + 0.2);
        assert!((0.40..=0.60).contains(&novice_rate));
        assert!((0.80..=0.95).contains(&expert_rate));
    }

    #[test]
    fn wrong_multiple_choice_answers_come_from_distractors() {
        let question = mc_question();
        let player = SimulatedPlayer::new("AI-1", 1);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let answer = player.answer(&question, &mut rng);
            assert!(
                answer == question.correct_answer || question.distractors.contains(&answer),
                "unexpected answer: {answer}"
            );
        }
    }

    #[test]
    fn wrong_true_false_answer_is_the_negation() {
        let question = tf_question();
        let player = SimulatedPlayer::new("AI-1", 1);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            let answer = player.answer(&question, &mut rng);
            assert!(answer == "True" || answer == "False");
        }
    }

    #[test]
    fn skill_is_clamped_to_valid_range() {
        assert_eq!(SimulatedPlayer::new("AI-1", 0).skill, 1);
        assert_eq!(SimulatedPlayer::new("AI-2", 9).skill, 5);
    }
}
