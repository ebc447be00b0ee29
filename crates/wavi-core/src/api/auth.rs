//! Login, sign-up and password reset.

use super::client::ApiClient;
use super::dto::{EmailCheckResponse, EmailRequest, Envelope, LoginRequest, PasswordResetRequest};
use super::endpoint::Endpoint;
use crate::error::{ApiError, AuthError, ValidationError};
use crate::signup::{validate_email, SignUpRequest};

/// Account operations. Tokens go to the client's token store.
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in and store the returned access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::Empty("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::Empty("password").into());
        }

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let env: Envelope<String> = match self.client.send(Endpoint::Login, Some(&body)).await {
            Ok(env) => env,
            Err(ApiError::Unauthorized { .. }) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        let raw = env.data.ok_or(AuthError::NoLoginData)?;
        let token = raw.strip_prefix("Bearer ").unwrap_or(&raw).trim();
        if token.is_empty() {
            return Err(AuthError::NoLoginData);
        }
        self.client.tokens().save_access_token(token)?;
        tracing::info!(email, "logged in");
        Ok(())
    }

    /// Clear every stored token.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.client.tokens().clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub fn is_logged_in(&self) -> Result<bool, AuthError> {
        Ok(self.client.tokens().load_access_token()?.is_some())
    }

    /// Ask the backend to mail a verification code.
    pub async fn initiate_signup(&self, email: &str) -> Result<(), AuthError> {
        validate_email(email)?;
        let body = EmailRequest {
            email: email.trim().to_string(),
        };
        self.client
            .send_unit(Endpoint::InitiateSignup, Some(&body))
            .await?;
        Ok(())
    }

    pub async fn complete_signup(&self, request: &SignUpRequest) -> Result<(), AuthError> {
        self.client
            .send_unit(Endpoint::CompleteSignup, Some(request))
            .await?;
        tracing::info!(email = %request.email, "sign-up completed");
        Ok(())
    }

    /// Whether `email` is still free to register.
    pub async fn check_email(&self, email: &str) -> Result<bool, AuthError> {
        validate_email(email)?;
        let body = EmailRequest {
            email: email.trim().to_string(),
        };
        let resp: EmailCheckResponse = self.client.send(Endpoint::CheckEmail, Some(&body)).await?;
        Ok(resp.available)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
        verification_code: &str,
    ) -> Result<(), AuthError> {
        validate_email(email)?;
        if new_password.is_empty() {
            return Err(ValidationError::Empty("newPassword").into());
        }
        if verification_code.trim().is_empty() {
            return Err(ValidationError::Empty("verificationCode").into());
        }
        let body = PasswordResetRequest {
            email: email.trim().to_string(),
            new_password: new_password.to_string(),
            verification_code: verification_code.trim().to_string(),
        };
        self.client
            .send_unit(Endpoint::ResetPassword, Some(&body))
            .await?;
        Ok(())
    }
}
