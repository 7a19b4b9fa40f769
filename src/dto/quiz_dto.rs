use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizPayload {
    /// User the quiz is generated for; recorded as its creator.
    pub requested_by: Uuid,
    #[serde(default)]
    pub regenerate: bool,
    #[validate(range(min = 1, max = 600, message = "Timeout must be between 1 and 600 seconds"))]
    pub timeout_secs: Option<u64>,
}
