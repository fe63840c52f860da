use crate::crm::response::{interpret_lead_create, interpret_list_subscribe, EnrollmentOutcome};
use crate::routes::NewContact;
use crate::utils::error_chain_fmt;
use secrecy::{ExposeSecret, Secret};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Which upstream Zoho surface the waitlist enrolls contacts through.
///
/// `list_subscribe` targets Zoho Campaigns ("add subscriber to mailing list"),
/// `lead_create` targets Zoho CRM ("create a Lead"). Both authenticate the
/// same way; their request and response shapes differ.
#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentMode {
    ListSubscribe,
    LeadCreate,
}

/// The full set of values required before any outbound call is attempted.
#[derive(Clone)]
pub struct ZohoCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub refresh_token: Secret<String>,
    pub list_key: String,
}

/// Short-lived bearer credential from the refresh-token exchange.
/// Owned by the server process, never exposed to the browser.
#[derive(Debug)]
pub struct AccessToken {
    token: Secret<String>,
}

#[derive(thiserror::Error)]
pub enum CrmError {
    #[error("Failed to reach the marketing platform")]
    Transport(#[from] reqwest::Error),
    #[error("The token exchange was rejected with status {0}")]
    TokenExchangeRejected(reqwest::StatusCode),
    #[error("The token endpoint returned an unexpected payload")]
    MalformedTokenPayload(#[source] reqwest::Error),
    #[error("The enrollment endpoint returned an unexpected payload")]
    MalformedEnrollmentPayload(#[source] reqwest::Error),
    #[error("The marketing platform rejected the enrollment: {raw}")]
    EnrollmentRejected { raw: serde_json::Value },
}

impl Debug for CrmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Deserialize)]
struct TokenPayload {
    access_token: String,
    expires_in: u64,
}

pub struct ZohoClient {
    http_client: reqwest::Client,
    accounts_base_url: String,
    api_base_url: String,
    mode: EnrollmentMode,
}

impl ZohoClient {
    pub fn new(
        accounts_base_url: String,
        api_base_url: String,
        mode: EnrollmentMode,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            accounts_base_url,
            api_base_url,
            mode,
        })
    }

    /// Trade the long-lived refresh token for a short-lived access token.
    ///
    /// A non-2xx answer or a body that is not the expected token shape is a
    /// hard failure; the caller must not proceed to the enrollment call.
    #[tracing::instrument(name = "Exchange refresh token for access token", skip(self, credentials))]
    pub async fn exchange_refresh_token(
        &self,
        credentials: &ZohoCredentials,
    ) -> Result<AccessToken, CrmError> {
        let url = format!("{}/oauth/v2/token", self.accounts_base_url);
        let params = [
            ("refresh_token", credentials.refresh_token.expose_secret().as_str()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret().as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.http_client.post(&url).form(&params).send().await?;
        if !response.status().is_success() {
            return Err(CrmError::TokenExchangeRejected(response.status()));
        }

        let payload: TokenPayload = response
            .json()
            .await
            .map_err(CrmError::MalformedTokenPayload)?;
        tracing::debug!(expires_in = payload.expires_in, "Obtained a fresh access token");

        Ok(AccessToken {
            token: Secret::new(payload.access_token),
        })
    }

    /// Enroll a contact through the configured upstream surface.
    ///
    /// A 2xx transport status alone does not count as success: Zoho can
    /// answer 200 with a failure payload, so the body's own status/code
    /// indicators decide.
    #[tracing::instrument(
        name = "Enroll a contact with the marketing platform",
        skip(self, token, credentials, contact),
        fields(email = %contact.email)
    )]
    pub async fn enroll(
        &self,
        token: &AccessToken,
        credentials: &ZohoCredentials,
        contact: &NewContact,
    ) -> Result<(), CrmError> {
        let outcome = match self.mode {
            EnrollmentMode::ListSubscribe => {
                self.subscribe_to_list(token, &credentials.list_key, contact)
                    .await?
            }
            EnrollmentMode::LeadCreate => self.create_lead(token, contact).await?,
        };

        match outcome {
            EnrollmentOutcome::Enrolled { list_name } => {
                tracing::info!(
                    list_name = list_name.as_deref().unwrap_or_default(),
                    "Contact enrolled"
                );
                Ok(())
            }
            EnrollmentOutcome::Rejected { raw } => Err(CrmError::EnrollmentRejected { raw }),
        }
    }

    async fn subscribe_to_list(
        &self,
        token: &AccessToken,
        list_key: &str,
        contact: &NewContact,
    ) -> Result<EnrollmentOutcome, CrmError> {
        let url = format!("{}/api/v1.1/json/listsubscribe", self.api_base_url);
        let mut contact_info = serde_json::json!({ "Contact Email": contact.email.as_ref() });
        if let Some(first_name) = &contact.first_name {
            contact_info["First Name"] = serde_json::Value::String(first_name.clone());
        }

        // The Campaigns API takes its arguments as query parameters, even on POST
        let response = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Zoho-oauthtoken {}", token.token.expose_secret()),
            )
            .query(&[
                ("resfmt", "JSON"),
                ("listkey", list_key),
                ("contactinfo", &contact_info.to_string()),
            ])
            .send()
            .await?;

        let http_ok = response.status().is_success();
        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(CrmError::MalformedEnrollmentPayload)?;
        if !http_ok {
            return Ok(EnrollmentOutcome::Rejected { raw });
        }
        Ok(interpret_list_subscribe(raw))
    }

    async fn create_lead(
        &self,
        token: &AccessToken,
        contact: &NewContact,
    ) -> Result<EnrollmentOutcome, CrmError> {
        let url = format!("{}/crm/v2/Leads", self.api_base_url);
        let mut lead = serde_json::json!({
            "Last_Name": "Waitlist",
            "Company": "Helthy Waitlist",
            "Email": contact.email.as_ref(),
            "Lead_Source": "Website Waitlist",
            "Description": "Helthy landing waitlist form signup",
        });
        if let Some(first_name) = &contact.first_name {
            lead["First_Name"] = serde_json::Value::String(first_name.clone());
        }
        let body = serde_json::json!({ "data": [lead], "trigger": [] });

        let response = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Zoho-oauthtoken {}", token.token.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let http_ok = response.status().is_success();
        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(CrmError::MalformedEnrollmentPayload)?;
        if !http_ok {
            return Ok(EnrollmentOutcome::Rejected { raw });
        }
        Ok(interpret_lead_create(raw))
    }
}
