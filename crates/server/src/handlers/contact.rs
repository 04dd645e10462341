use axum::{body::Bytes, extract::State, Json};
use twin_core::ErrorKind;
use twin_mail::{ContactForm, ContactOutcome, REQUIRED_FIELDS_MESSAGE};

use crate::state::AppState;

/// Relay a contact form. A body that is not a form with string fields is
/// reported like a form with missing fields.
pub async fn contact_handler(State(state): State<AppState>, body: Bytes) -> Json<ContactOutcome> {
    let form: ContactForm = match serde_json::from_slice(&body) {
        Ok(form) => form,
        Err(err) => {
            tracing::warn!("rejected contact request body: {}", err);
            return Json(ContactOutcome::Failed {
                kind: ErrorKind::InvalidInput,
                error: REQUIRED_FIELDS_MESSAGE.to_string(),
            });
        }
    };

    Json(state.relay.send(&form).await)
}
