use crate::configuration::CrmSettings;
use crate::crm::{CrmError, ZohoClient};
use crate::routes::{NewContact, SubscriberEmail};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use std::fmt::{Debug, Formatter};

#[derive(serde::Deserialize)]
pub struct WaitlistForm {
    email: String,
    #[serde(rename = "firstName")]
    first_name: Option<String>,
}

impl TryFrom<WaitlistForm> for NewContact {
    type Error = String;
    fn try_from(form: WaitlistForm) -> Result<Self, Self::Error> {
        Ok(NewContact {
            email: SubscriberEmail::parse(form.email)?,
            first_name: form.first_name,
        })
    }
}

/// The caller only ever sees the Display text of these variants; the full
/// upstream detail stays in the server-side logs via the Debug chain.
#[derive(thiserror::Error)]
pub enum WaitlistError {
    #[error("Valid email address is required")]
    InvalidEmail(String),
    #[error("Server configuration error")]
    MissingConfiguration,
    #[error("Failed to join waitlist. Please try again later.")]
    Upstream(#[from] CrmError),
    #[error("Failed to join waitlist. Please try again later.")]
    Unexpected(#[from] anyhow::Error),
}

impl ResponseError for WaitlistError {
    fn status_code(&self) -> StatusCode {
        match self {
            WaitlistError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            WaitlistError::MissingConfiguration
            | WaitlistError::Upstream(_)
            | WaitlistError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

impl Debug for WaitlistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)?;
        if let WaitlistError::InvalidEmail(detail) = self {
            writeln!(f, "Rejected input:\n\t{}", detail)?;
        }
        Ok(())
    }
}

/// One pass per request: validate, check configuration, exchange the refresh
/// token, enroll. The first failing step answers immediately; nothing is
/// retried.
#[tracing::instrument(
    name = "Add a contact to the waitlist",
    skip(form, crm_client, crm_settings),
    fields(email = %form.email)
)]
pub async fn join_waitlist(
    web::Json(form): web::Json<WaitlistForm>,
    crm_client: web::Data<ZohoClient>,
    crm_settings: web::Data<CrmSettings>,
) -> Result<HttpResponse, WaitlistError> {
    let contact: NewContact = form.try_into().map_err(WaitlistError::InvalidEmail)?;

    // Fail fast before touching the network when the operator has not wired
    // up the CRM credentials
    let credentials = crm_settings
        .credentials()
        .ok_or(WaitlistError::MissingConfiguration)?;

    let token = crm_client.exchange_refresh_token(&credentials).await?;
    crm_client.enroll(&token, &credentials, &contact).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Successfully added to waitlist!",
    })))
}
