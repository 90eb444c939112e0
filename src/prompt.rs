//! Prompt text sent to the models and parsing of the text model's reply.

use crate::deck::Card;

pub const ANSWER_MARKER: &str = "Answer to question:";
pub const TAKEAWAY_LABEL: &str = "Takeaway:";

const INSTRUCTIONS: &str = "Provide a brief takeaway (1-2 sentences) summarizing the card's theme, \
followed by \"Answer to question:\" and an answer to the question based on the card. \
Keep both concise and strip all markup styling. \
If the user asks in Chinese, reply in Chinese zh-hk. \
If the card is not directly related, please still make up an insight that suits.";

/// Compose the text-model prompt for `card` and `question`.
pub fn build_prompt(card: &Card, question: &str) -> String {
    format!(
        "{title}\n{content}\n\n{INSTRUCTIONS}\n\n{TAKEAWAY_LABEL}\n{ANSWER_MARKER} {question}",
        title = card.title,
        content = card.content,
    )
}

pub fn image_prompt(answer: &str) -> String {
    format!("Create a visual representation of the following concept: {answer}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub takeaway: String,
    pub answer: String,
    /// False when the model ignored the requested format.
    pub is_structured: bool,
}

/// Split raw model output into takeaway and answer.
///
/// Splits on the first [`ANSWER_MARKER`]. Without a marker the whole trimmed
/// text fills both fields.
pub fn parse_reply(raw: &str) -> Reply {
    match raw.split_once(ANSWER_MARKER) {
        Some((before, after)) => {
            let before = before.trim_start();
            let takeaway = before.strip_prefix(TAKEAWAY_LABEL).unwrap_or(before);
            Reply {
                takeaway: takeaway.trim().to_string(),
                answer: after.trim().to_string(),
                is_structured: true,
            }
        }
        None => {
            let text = raw.trim().to_string();
            Reply {
                takeaway: text.clone(),
                answer: text,
                is_structured: false,
            }
        }
    }
}
