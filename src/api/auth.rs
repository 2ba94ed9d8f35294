// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, token refresh and forgotten passwords.
//!
//! Login and refresh return the token in the `Authorization` response
//! header and send no body.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode},
};

use crate::{
    auth::{
        middleware::bearer_header,
        password::{generate_password, hash_password_blocking},
        AuthError, Authenticated, Credentials,
    },
    error::ApiError,
    extractors::ValidatedJson,
    mail::MailMessage,
    models::ForgotPasswordRequest,
    state::AppState,
};

type TokenResponse = (StatusCode, [(HeaderName, HeaderValue); 1]);

fn token_response(status: StatusCode, state: &AppState, username: &str) -> Result<TokenResponse, ApiError> {
    let token = state.tokens.issue(username).map_err(AuthError::from)?;
    Ok((status, [(AUTHORIZATION, bearer_header(&token)?)]))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> Result<TokenResponse, ApiError> {
    let identity = match state.identities.authenticate(&credentials).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::info!(username = %credentials.username, "login failed");
            return Err(err.into());
        }
    };

    tracing::info!(customer_id = identity.id, "login succeeded");
    // The subject is the name as submitted; lookups by subject ignore case.
    token_response(StatusCode::OK, &state, &credentials.username)
}

/// `POST /auth/refresh_token`
///
/// Issues a new token for the caller with a fresh expiration window.
pub async fn refresh_token(
    State(state): State<AppState>,
    Authenticated(context): Authenticated,
) -> Result<TokenResponse, ApiError> {
    token_response(StatusCode::NO_CONTENT, &state, &context.username)
}

/// `POST /auth/forgot`
///
/// Replaces the customer's password with a generated one and mails it.
/// Unknown emails are `not_found`.
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let customer = state
        .store
        .read()
        .await
        .find_customer_by_email(&request.email)?;

    let password = generate_password();
    let password_hash = hash_password_blocking(password.clone())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .store
        .write()
        .await
        .set_password_hash(customer.id, password_hash)?;

    state
        .mailer
        .send(MailMessage::new_password(&customer.email, &password))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    tracing::info!(customer_id = customer.id, "password reset");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{Identity, IdentityLookup, Role, SecurityContext};
    use crate::testing::{seed_identity, test_state, RecordingMailer};
    use async_trait::async_trait;

    fn credentials(username: &str, password: &str) -> ValidatedJson<Credentials> {
        ValidatedJson(Credentials {
            username: username.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn login_returns_token_for_valid_credentials() {
        let state = test_state();
        seed_identity(&state, "admin@example.com", "correct", &[Role::Admin]).await;

        let (status, [(name, value)]) = login(
            State(state.clone()),
            credentials("admin@example.com", "correct"),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(name, AUTHORIZATION);
        let token = value.to_str().unwrap().strip_prefix("Bearer ").unwrap();
        assert_eq!(state.tokens.validate(token).unwrap(), "admin@example.com");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let state = test_state();
        seed_identity(&state, "admin@example.com", "correct", &[Role::Admin]).await;

        let err = login(State(state), credentials("admin@example.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "invalid_credentials");
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_the_same_way() {
        let state = test_state();
        let err = login(State(state), credentials("nobody@example.com", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.code, "invalid_credentials");
    }

    #[tokio::test]
    async fn token_subject_is_the_submitted_username() {
        let state = test_state();
        seed_identity(&state, "admin@example.com", "correct", &[Role::Admin]).await;

        let (_, [(_, value)]) = login(
            State(state.clone()),
            credentials("ADMIN@example.com", "correct"),
        )
        .await
        .unwrap();

        let token = value.to_str().unwrap().strip_prefix("Bearer ").unwrap();
        assert_eq!(state.tokens.validate(token).unwrap(), "ADMIN@example.com");
    }

    /// Lookup holding one identity outside the store.
    struct SingleIdentity(Identity);

    #[async_trait]
    impl IdentityLookup for SingleIdentity {
        async fn find_by_username(&self, username: &str) -> Option<Identity> {
            (self.0.username == username).then(|| self.0.clone())
        }
    }

    #[tokio::test]
    async fn login_uses_the_configured_identity_lookup() {
        let identity = Identity {
            id: 7,
            username: "operator".into(),
            password_hash: crate::auth::password::hash_password("correct").unwrap(),
            roles: [Role::Admin].into_iter().collect(),
        };
        let state = test_state().with_identities(Arc::new(SingleIdentity(identity)));

        let (status, _) = login(State(state.clone()), credentials("operator", "correct"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(state.store.read().await.customer_by_email("operator").is_none());
    }

    #[tokio::test]
    async fn forgot_password_mails_a_working_new_password() {
        let mailer = Arc::new(RecordingMailer::default());
        let state = test_state().with_mailer(mailer.clone());
        seed_identity(&state, "maria@example.com", "old-password", &[Role::Customer]).await;

        let status = forgot_password(
            State(state.clone()),
            ValidatedJson(ForgotPasswordRequest {
                email: "maria@example.com".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "maria@example.com");
        let password = sent[0].body.rsplit(' ').next().unwrap().to_string();

        assert!(login(State(state.clone()), credentials("maria@example.com", "old-password"))
            .await
            .is_err());
        assert!(login(State(state), credentials("maria@example.com", &password))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn forgot_password_for_unknown_email_is_not_found() {
        let mailer = Arc::new(RecordingMailer::default());
        let state = test_state().with_mailer(mailer.clone());

        let err = forgot_password(
            State(state),
            ValidatedJson(ForgotPasswordRequest {
                email: "ghost@example.com".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn refresh_issues_token_for_caller() {
        let state = test_state();
        let context = SecurityContext {
            customer_id: 1,
            username: "maria@example.com".into(),
            roles: [Role::Customer].into_iter().collect(),
        };

        let (status, [(_, value)]) = refresh_token(State(state.clone()), Authenticated(context))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        let token = value.to_str().unwrap().strip_prefix("Bearer ").unwrap();
        assert_eq!(state.tokens.validate(token).unwrap(), "maria@example.com");
    }
}
