//! Statistical defect classifier.
//!
//! A bag-of-n-grams vectorizer feeding a bagged tree ensemble, trained
//! exactly once, eagerly, at construction, from the synthetic corpus. The
//! trained classifier is read-only and safe for concurrent invocation. If
//! training degenerates the classifier stays untrained and `classify`
//! returns a neutral constant instead of erroring.

pub mod corpus;
pub mod forest;
pub mod vectorizer;

use forest::RandomForest;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vectorizer::NgramVectorizer;

/// Probability reported when the model never trained.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;
pub const TRAINED_CONFIDENCE: f64 = 0.8;
pub const UNTRAINED_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct DefectClassifier {
    model: Option<TrainedModel>,
}

#[derive(Debug, Clone)]
struct TrainedModel {
    vectorizer: NgramVectorizer,
    forest: RandomForest,
}

impl DefectClassifier {
    /// Train from the synthetic corpus. Runs to completion before the value
    /// exists, which is the single-execution barrier the hot path relies on.
    pub fn train(seed: u64) -> Self {
        let samples = corpus::synthetic_corpus(seed);
        let model = fit(&samples, seed);
        match &model {
            Some(trained) => log::debug!(
                "defect classifier trained: {} samples, {} features",
                samples.len(),
                trained.vectorizer.vocabulary_len()
            ),
            None => log::warn!("defect classifier training degenerated, using neutral scoring"),
        }
        Self { model }
    }

    /// An explicitly untrained classifier (neutral scoring), for tests and
    /// degraded construction.
    pub fn untrained() -> Self {
        Self { model: None }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Probability in `[0.0, 1.0]` that the sample is defective. Never
    /// errors; the untrained path returns [`NEUTRAL_PROBABILITY`].
    pub fn classify(&self, code: &str) -> f64 {
        match &self.model {
            Some(model) => {
                let row = model.vectorizer.transform(code);
                model.forest.predict_proba(&row)
            }
            None => NEUTRAL_PROBABILITY,
        }
    }

    pub fn confidence(&self) -> f64 {
        if self.is_trained() {
            TRAINED_CONFIDENCE
        } else {
            UNTRAINED_CONFIDENCE
        }
    }
}

fn fit(samples: &[corpus::LabeledSample], seed: u64) -> Option<TrainedModel> {
    let documents: Vec<&str> = samples.iter().map(|s| s.code.as_str()).collect();
    let labels: Vec<u8> = samples.iter().map(|s| s.label).collect();

    let vectorizer = NgramVectorizer::fit(&documents)?;
    let rows: Vec<Vec<f64>> = documents
        .iter()
        .map(|doc| vectorizer.transform(doc))
        .collect();

    // The forest stream is derived from the corpus seed so one seed pins
    // the whole training run.
    let mut rng = StdRng::seed_from_u64(seed.rotate_left(17));
    let forest = RandomForest::fit(&rows, &labels, &mut rng)?;

    Some(TrainedModel { vectorizer, forest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CLASSIFIER_SEED;

    #[test]
    fn trains_from_the_builtin_corpus() {
        let classifier = DefectClassifier::train(DEFAULT_CLASSIFIER_SEED);
        assert!(classifier.is_trained());
        assert_eq!(classifier.confidence(), TRAINED_CONFIDENCE);
    }

    #[test]
    fn probabilities_are_bounded_for_any_input() {
        let classifier = DefectClassifier::train(DEFAULT_CLASSIFIER_SEED);
        for code in ["", "def f(): pass", "eval(x)\nexcept:\n    pass", "???"] {
            let p = classifier.classify(code);
            assert!((0.0..=1.0).contains(&p), "out of range for {code:?}: {p}");
        }
    }

    #[test]
    fn defective_shaped_code_scores_above_clean_shaped_code() {
        let classifier = DefectClassifier::train(DEFAULT_CLASSIFIER_SEED);
        let defective = "def process(x):\n    try:\n        result = eval(x)\n        exec(x)\n    except:\n        pass";
        let clean = "def calculate_sum(numbers: List[int]) -> int:\n    '''Calculate the sum of numbers.'''\n    if not numbers:\n        return 0\n    return sum(numbers)";
        assert!(classifier.classify(defective) > classifier.classify(clean));
    }

    #[test]
    fn same_seed_gives_identical_predictions() {
        let first = DefectClassifier::train(7);
        let second = DefectClassifier::train(7);
        let code = "password = 'x'\neval(data)";
        assert_eq!(first.classify(code), second.classify(code));
    }

    #[test]
    fn untrained_classifier_is_neutral() {
        let classifier = DefectClassifier::untrained();
        assert!(!classifier.is_trained());
        assert_eq!(classifier.classify("anything"), NEUTRAL_PROBABILITY);
        assert_eq!(classifier.confidence(), UNTRAINED_CONFIDENCE);
    }
}
