// src/quiz/answer.rs

use serde::{Deserialize, Serialize};

/// Wire value of `selected_option_index` when the question timed out.
pub const TIMEOUT_SENTINEL: i64 = -1;

/// The single answer captured for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: i64,

    /// `None` when the countdown ran out. Serialized as `-1` in that case.
    #[serde(with = "sentinel")]
    pub selected_option_index: Option<usize>,

    pub is_correct: bool,

    /// Whole seconds spent on the question, never above the time limit.
    pub time_spent_seconds: u32,
}

impl AnswerRecord {
    pub fn timed_out(&self) -> bool {
        self.selected_option_index.is_none()
    }
}

mod sentinel {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::TIMEOUT_SENTINEL;

    pub fn serialize<S: Serializer>(value: &Option<usize>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => s.serialize_u64(*index as u64),
            None => s.serialize_i64(TIMEOUT_SENTINEL),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(d)?;
        if raw == TIMEOUT_SENTINEL {
            return Ok(None);
        }
        usize::try_from(raw)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid option index {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_serializes_as_sentinel() {
        let record = AnswerRecord {
            question_id: 3,
            selected_option_index: None,
            is_correct: false,
            time_spent_seconds: 10,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["selected_option_index"], TIMEOUT_SENTINEL);

        let back: AnswerRecord = serde_json::from_value(json).unwrap();
        assert!(back.timed_out());
    }

    #[test]
    fn test_negative_index_other_than_sentinel_is_rejected() {
        let json = serde_json::json!({
            "question_id": 1,
            "selected_option_index": -4,
            "is_correct": false,
            "time_spent_seconds": 1
        });
        assert!(serde_json::from_value::<AnswerRecord>(json).is_err());
    }
}
