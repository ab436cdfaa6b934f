use crate::types::{Question, QuestionKind};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

/// Read-only source of sampled questions for sessions.
///
/// Holds the immutable corpus; every draw is a pure function of the corpus
/// and the caller-supplied RNG, so seeded callers get reproducible samples.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw a random, non-repeating sample of up to `n` answerable questions.
    ///
    /// Questions that cannot be played (a MultipleChoice or FillBlank entry
    /// without distractors) are filtered out before the shuffle, so the
    /// sample length is `min(n, usable)`.
    pub fn sample(&self, n: usize, rng: &mut impl Rng) -> Vec<Question> {
        let mut usable: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.is_answerable())
            .cloned()
            .collect();
        usable.shuffle(rng);
        usable.truncate(n);
        usable
    }

    /// List questions matching the given filters, up to `limit`.
    pub fn filtered(
        &self,
        kind: Option<QuestionKind>,
        difficulty: Option<u8>,
        limit: usize,
    ) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| kind.is_none_or(|k| q.kind == k))
            .filter(|q| difficulty.is_none_or(|d| q.difficulty == d))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Pick one random question matching the given filters.
    pub fn random(
        &self,
        kind: Option<QuestionKind>,
        difficulty: Option<u8>,
        rng: &mut impl Rng,
    ) -> Option<Question> {
        let matching: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| kind.is_none_or(|k| q.kind == k))
            .filter(|q| difficulty.is_none_or(|d| q.difficulty == d))
            .collect();
        matching.choose(rng).map(|q| (*q).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mc(prompt: &str) -> Question {
        Question {
            kind: QuestionKind::MultipleChoice,
            prompt: prompt.to_string(),
            correct_answer: "right".to_string(),
            distractors: vec!["wrong a".to_string(), "wrong b".to_string()],
            difficulty: 2,
            reference: None,
        }
    }

    fn broken_mc(prompt: &str) -> Question {
        Question {
            distractors: Vec::new(),
            ..mc(prompt)
        }
    }

    #[test]
    fn sample_has_no_duplicates_and_respects_n() {
        let pool: Vec<Question> = (0..30).map(|i| mc(&format!("q{}", i))).collect();
        let bank = QuestionBank::new(pool);
        let mut rng = StdRng::seed_from_u64(7);

        let sample = bank.sample(10, &mut rng);
        assert_eq!(sample.len(), 10);

        let mut prompts: Vec<&str> = sample.iter().map(|q| q.prompt.as_str()).collect();
        prompts.sort_unstable();
        prompts.dedup();
        assert_eq!(prompts.len(), 10);
    }

    #[test]
    fn sample_is_capped_by_usable_pool() {
        let bank = QuestionBank::new(vec![mc("a"), mc("b"), broken_mc("c")]);
        let mut rng = StdRng::seed_from_u64(7);

        let sample = bank.sample(10, &mut rng);
        assert_eq!(sample.len(), 2);
        assert!(sample.iter().all(|q| q.prompt != "c"));
    }

    #[test]
    fn sample_is_deterministic_for_a_seed() {
        let pool: Vec<Question> = (0..20).map(|i| mc(&format!("q{}", i))).collect();
        let bank = QuestionBank::new(pool);

        let a = bank.sample(5, &mut StdRng::seed_from_u64(42));
        let b = bank.sample(5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn filtered_applies_kind_and_difficulty() {
        let mut hard = mc("hard");
        hard.difficulty = 5;
        let tf = Question {
            kind: QuestionKind::TrueFalse,
            prompt: "tf".to_string(),
            correct_answer: "True".to_string(),
            distractors: Vec::new(),
            difficulty: 5,
            reference: None,
        };
        let bank = QuestionBank::new(vec![mc("easy"), hard, tf]);

        let result = bank.filtered(Some(QuestionKind::MultipleChoice), Some(5), 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].prompt, "hard");

        let by_difficulty = bank.filtered(None, Some(5), 10);
        assert_eq!(by_difficulty.len(), 2);
    }

    #[test]
    fn random_returns_none_on_no_match() {
        let bank = QuestionBank::new(vec![mc("a")]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(bank
            .random(Some(QuestionKind::FillBlank), None, &mut rng)
            .is_none());
        assert!(bank.random(None, None, &mut rng).is_some());
    }
}
