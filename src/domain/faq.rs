//! FAQ normalization.
//!
//! Legacy storage keeps questions and answers in one table: an answer is a
//! row whose `parent_id` points at its question. Depending on the read path
//! the answers arrive either pre-joined onto each question or as a flat list.
//! Both shapes are folded into [`FaqEntry`] here, before anything downstream
//! looks at them.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqAnswer {
    pub id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub id: i64,
    pub question: String,
    pub answers: Vec<FaqAnswer>,
}

/// One row as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRow {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub content: String,
    /// `Some` when the read path already joined the answers.
    pub answers: Option<Vec<FaqAnswer>>,
}

/// Fold raw rows into question entries, preserving row order.
pub fn normalize(rows: Vec<QuestionRow>) -> Vec<FaqEntry> {
    let (questions, flat_answers): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|row| row.parent_id.is_none());

    questions
        .into_iter()
        .filter(|question| !question.content.trim().is_empty())
        .map(|question| {
            let answers = match question.answers {
                Some(joined) if !joined.is_empty() => joined,
                _ => flat_answers
                    .iter()
                    .filter(|row| row.parent_id == Some(question.id))
                    .map(|row| FaqAnswer {
                        id: row.id,
                        content: row.content.clone(),
                    })
                    .collect(),
            };

            FaqEntry {
                id: question.id,
                question: question.content,
                answers,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, content: &str) -> QuestionRow {
        QuestionRow {
            id,
            parent_id: None,
            content: content.to_string(),
            answers: None,
        }
    }

    fn answer(id: i64, parent: i64, content: &str) -> QuestionRow {
        QuestionRow {
            id,
            parent_id: Some(parent),
            content: content.to_string(),
            answers: None,
        }
    }

    #[test]
    fn flat_rows_are_grouped_by_parent() {
        let rows = vec![
            question(1, "Vize ücreti ne kadar?"),
            answer(2, 1, "80 Euro."),
            question(3, "Ne kadar sürer?"),
            answer(4, 3, "15 gün."),
            answer(5, 1, "Çocuklar için 40 Euro."),
        ];

        let entries = normalize(rows);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].answers.len(), 2);
        assert_eq!(entries[0].answers[1].content, "Çocuklar için 40 Euro.");
        assert_eq!(entries[1].answers[0].id, 4);
    }

    #[test]
    fn pre_joined_answers_are_kept_as_is() {
        let mut joined = question(1, "Randevu gerekli mi?");
        joined.answers = Some(vec![FaqAnswer {
            id: 9,
            content: "Evet.".to_string(),
        }]);

        let entries = normalize(vec![joined, answer(2, 1, "ignored flat answer")]);
        assert_eq!(entries[0].answers.len(), 1);
        assert_eq!(entries[0].answers[0].id, 9);
    }

    #[test]
    fn empty_join_falls_back_to_flat_rows() {
        let mut joined = question(1, "Randevu gerekli mi?");
        joined.answers = Some(Vec::new());

        let entries = normalize(vec![joined, answer(2, 1, "Evet.")]);
        assert_eq!(entries[0].answers[0].content, "Evet.");
    }

    #[test]
    fn blank_questions_are_skipped() {
        let entries = normalize(vec![question(1, "  "), answer(2, 1, "orphan")]);
        assert!(entries.is_empty());
    }
}
