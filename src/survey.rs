use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A survey definition as produced by the editing surface: an ordered list
/// of questions, each optionally carrying a branching directive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Survey {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Closing message shown after the survey completes. Its presence only
    /// changes how the terminal node is sized, never the graph topology.
    #[serde(default)]
    pub thank_you: Option<String>,
}

impl Survey {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            title: None,
            questions,
            thank_you: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable id assigned by the editor. The flow graph keys nodes by
    /// position, so this is carried through untouched.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionType,
    #[serde(default)]
    pub branching: Option<Branching>,
}

impl Question {
    pub fn new(kind: QuestionType) -> Self {
        Self {
            id: None,
            prompt: String::new(),
            kind,
            branching: None,
        }
    }

    pub fn with_branching(mut self, branching: Branching) -> Self {
        self.branching = Some(branching);
        self
    }

    /// Whether response-based branching is offered for this question at
    /// all. Question types without a bucketable answer domain fall through
    /// to the single default handle.
    pub fn supports_response_branching(&self) -> bool {
        match &self.kind {
            QuestionType::Rating { scale } => matches!(scale, 3 | 5 | 7 | 10),
            QuestionType::SingleChoice { choices } => !choices.is_empty(),
            _ => false,
        }
    }

    /// The answer buckets usable as response-based branching keys, in
    /// display order. Empty for question types without buckets.
    pub fn response_buckets(&self) -> Vec<Bucket> {
        match &self.kind {
            QuestionType::Rating { scale } => rating_buckets(*scale),
            QuestionType::SingleChoice { choices } => choices
                .iter()
                .enumerate()
                .map(|(idx, choice)| Bucket::new(idx.to_string(), choice.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionType {
    Rating { scale: u8 },
    SingleChoice { choices: Vec<String> },
    OpenText,
    LongText,
    ContactForm,
}

/// Where the survey flow continues after a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branching {
    /// Continue in sequence. Also the implicit default when a question has
    /// no branching at all.
    NextQuestion,
    End,
    /// Jump to the question at a 0-based absolute index. May point backward
    /// or forward; indices are not validated here.
    SpecificQuestion { index: usize },
    /// One destination per answer bucket. Buckets absent from the map fall
    /// back to `NextQuestion`.
    ResponseBased {
        response_values: BTreeMap<String, Destination>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    NextQuestion,
    End,
    Question(usize),
}

/// A named partition of a question's answer domain, used as a
/// response-based branching key and as the label on the matching edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: String,
    pub label: String,
}

impl Bucket {
    fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

fn rating_buckets(scale: u8) -> Vec<Bucket> {
    match scale {
        3 => vec![
            Bucket::new("negative", "1 (Negative)"),
            Bucket::new("neutral", "2 (Neutral)"),
            Bucket::new("positive", "3 (Positive)"),
        ],
        5 => vec![
            Bucket::new("negative", "1 to 2 (Negative)"),
            Bucket::new("neutral", "3 (Neutral)"),
            Bucket::new("positive", "4 to 5 (Positive)"),
        ],
        7 => vec![
            Bucket::new("negative", "1 to 3 (Negative)"),
            Bucket::new("neutral", "4 (Neutral)"),
            Bucket::new("positive", "5 to 7 (Positive)"),
        ],
        10 => vec![
            Bucket::new("detractors", "0 to 6 (Detractors)"),
            Bucket::new("passives", "7 to 8 (Passives)"),
            Bucket::new("promoters", "9 to 10 (Promoters)"),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nps_buckets_in_declared_order() {
        let question = Question::new(QuestionType::Rating { scale: 10 });
        let buckets = question.response_buckets();
        let keys: Vec<&str> = buckets
            .iter()
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(keys, ["detractors", "passives", "promoters"]);
    }

    #[test]
    fn single_choice_buckets_keyed_by_index() {
        let question = Question::new(QuestionType::SingleChoice {
            choices: vec!["Red".to_string(), "Blue".to_string()],
        });
        let buckets = question.response_buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "0");
        assert_eq!(buckets[0].label, "Red");
        assert_eq!(buckets[1].key, "1");
    }

    #[test]
    fn open_text_has_no_buckets() {
        let question = Question::new(QuestionType::OpenText);
        assert!(!question.supports_response_branching());
        assert!(question.response_buckets().is_empty());
    }

    #[test]
    fn unknown_rating_scale_is_not_branchable() {
        let question = Question::new(QuestionType::Rating { scale: 4 });
        assert!(!question.supports_response_branching());
    }

    #[test]
    fn survey_deserializes_from_json() {
        let input = r#"{
            "questions": [
                {
                    "prompt": "How likely are you to recommend us?",
                    "type": "rating",
                    "scale": 10,
                    "branching": {
                        "response_based": {
                            "response_values": {
                                "detractors": "end",
                                "promoters": { "question": 2 }
                            }
                        }
                    }
                },
                { "prompt": "Why?", "type": "open_text" }
            ]
        }"#;
        let survey: Survey = serde_json::from_str(input).expect("survey should parse");
        assert_eq!(survey.len(), 2);
        let Some(Branching::ResponseBased { response_values }) = &survey.questions[0].branching
        else {
            panic!("expected response-based branching");
        };
        assert_eq!(response_values.get("detractors"), Some(&Destination::End));
        assert_eq!(
            response_values.get("promoters"),
            Some(&Destination::Question(2))
        );
    }
}
