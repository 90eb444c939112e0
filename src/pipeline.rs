use crate::deck::Card;
use crate::error::AppError;
use crate::genai::GeneratedImage;
use crate::prompt::{build_prompt, image_prompt, parse_reply};
use crate::AppState;

/// Everything one successful `/ask` produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answered {
    pub card_id: String,
    pub card: Card,
    pub takeaway: String,
    pub answer: String,
    pub image: Option<GeneratedImage>,
}

/// Draw a card, ask the text model about it, then illustrate the answer.
///
/// Empty questions are rejected before any model call. The image call only
/// happens once the text call has succeeded.
pub async fn ask(state: &AppState, question: &str) -> Result<Answered, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::BadRequest(
            "Field \"question\" must be a non-empty string".to_string(),
        ));
    }

    let entry = state.deck.draw(state.selector.as_ref());
    tracing::info!(card = %entry.id, title = %entry.card.title, "card drawn");

    let prompt = build_prompt(&entry.card, question);
    let raw = state
        .text_model
        .generate_text(&prompt)
        .await
        .inspect_err(|err| tracing::error!(error = %err, card = %entry.id, "text generation failed"))?;

    let reply = parse_reply(&raw);
    if !reply.is_structured {
        tracing::warn!(card = %entry.id, "reply has no answer marker, using raw text for both fields");
    }

    let image = state
        .image_model
        .generate_image(&image_prompt(&reply.answer))
        .await
        .inspect_err(|err| tracing::error!(error = %err, card = %entry.id, "image generation failed"))?;
    if image.is_none() {
        tracing::warn!(card = %entry.id, "image model returned no image");
    }

    Ok(Answered {
        card_id: entry.id.clone(),
        card: entry.card.clone(),
        takeaway: reply.takeaway,
        answer: reply.answer,
        image,
    })
}
