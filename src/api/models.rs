use serde::{Deserialize, Serialize};

use crate::deck::Card;
use crate::pipeline::Answered;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub card: Card,
    pub takeaway: String,
    pub answer: String,
    /// Base64 image bytes, or null when the model returned none.
    pub image: Option<String>,
    pub image_mime_type: Option<String>,
}

impl From<Answered> for AskResponse {
    fn from(answered: Answered) -> Self {
        let (image, image_mime_type) = match answered.image {
            Some(image) => (Some(image.data), Some(image.mime_type)),
            None => (None, None),
        };
        Self {
            card: answered.card,
            takeaway: answered.takeaway,
            answer: answered.answer,
            image,
            image_mime_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
