use anyhow::anyhow;
use axum::{debug_handler, extract::{Path, Query, State}, response::{IntoResponse, Redirect}};
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeVerifier, TokenResponse};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{session::{self, CSRF_STATE, PKCE_VERIFIER, RETURN_URL, USER}, AppResult, AppState};

use super::{clients::ClientProvider, Clients};

#[derive(Deserialize)]
pub struct LockinQuery {
    pub state: Option<String>,
    pub code: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn lockin(
    Path(provider): Path<ClientProvider>,
    Query(LockinQuery { state, code }): Query<LockinQuery>,
    State(clients): State<Clients>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    let state = CsrfToken::new(state.ok_or_else(|| anyhow!("OAuth: without state"))?);
    let code = AuthorizationCode::new(code.ok_or_else(|| anyhow!("OAuth: without code"))?);

    let Some(stored_state) = session.remove::<String>(CSRF_STATE).await? else {
        return Err(anyhow!("no csrf_state").into());
    };

    if state.secret().as_str() != stored_state.as_str() {
        return Err(anyhow!("csrf tokens don't match").into());
    }

    let Some(pkce_verifier) = session.remove::<String>(PKCE_VERIFIER).await? else {
        return Err(anyhow!("no pkce_verifier").into());
    };

    let client = clients.get_client(provider)?;
    let http_client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("letmeask/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let token_result = client
        .exchange_code(code)
        .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
        .request_async(&http_client)
        .await?;

    let access_token = token_result.access_token().secret();
    let profile: serde_json::Value = http_client.get(provider.profile_url())
        .bearer_auth(access_token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let user = provider.user_from_profile(&profile)?;
    tracing::info!("welcome {} ({})", user.name, user.id);
    session.insert(USER, user).await?;

    let return_url = session.remove::<String>(RETURN_URL).await?;
    Ok(Redirect::to(&session::safe_return_url(return_url)))
}
