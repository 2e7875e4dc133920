use std::fmt;

use anyhow::anyhow;
use oauth2::{AuthUrl, Client, ClientId, ClientSecret, RedirectUrl, TokenUrl, basic::BasicClient};
use serde::Deserialize;
use serde_json::Value;

use crate::{GetField, model::User};

type HappyClient = Client<oauth2::StandardErrorResponse<oauth2::basic::BasicErrorResponseType>, oauth2::StandardTokenResponse<oauth2::EmptyExtraTokenFields, oauth2::basic::BasicTokenType>, oauth2::StandardTokenIntrospectionResponse<oauth2::EmptyExtraTokenFields, oauth2::basic::BasicTokenType>, oauth2::StandardRevocableToken, oauth2::StandardErrorResponse<oauth2::RevocationErrorResponseType>, oauth2::EndpointSet, oauth2::EndpointNotSet, oauth2::EndpointNotSet, oauth2::EndpointNotSet, oauth2::EndpointSet>;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientProvider {
    Google,
    Github,
}

impl ClientProvider {
    pub fn id(&self) -> &str {
        use ClientProvider::*;
        match self {
            Google => "google",
            Github => "github",
        }
    }

    pub(crate) fn scopes(&self) -> &'static [&'static str] {
        use ClientProvider::*;
        match self {
            Google => &["openid", "profile"],
            Github => &["read:user"],
        }
    }

    pub(crate) fn profile_url(&self) -> &'static str {
        use ClientProvider::*;
        match self {
            Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            Github => "https://api.github.com/user",
        }
    }

    fn endpoints(&self) -> (&'static str, &'static str) {
        use ClientProvider::*;
        match self {
            Google => ("https://accounts.google.com/o/oauth2/auth", "https://oauth2.googleapis.com/token"),
            Github => ("https://github.com/login/oauth/authorize", "https://github.com/login/oauth/access_token"),
        }
    }

    /// Builds the signed-in user from the provider's profile response.
    pub(crate) fn user_from_profile(&self, profile: &Value) -> anyhow::Result<User> {
        use ClientProvider::*;
        let (id, name, avatar) = match self {
            Google => (
                profile.get_str_field("id")?,
                profile.get_str_field("name")?,
                profile.get_str_field("picture").unwrap_or_default(),
            ),
            Github => {
                let id = profile
                    .get("id")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| anyhow!("expected numeric id in {profile}"))?
                    .to_string();
                let login = profile.get_str_field("login")?;
                let name = profile.get_str_field("name").unwrap_or(login);
                (id, name, profile.get_str_field("avatar_url").unwrap_or_default())
            }
        };

        Ok(User {
            id: format!("{}:{id}", self.id()),
            name,
            avatar,
        })
    }
}

impl fmt::Display for ClientProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone)]
pub struct Clients {
    google_client: Option<HappyClient>,
    github_client: Option<HappyClient>,
}

impl Clients {
    /// Reads `{"google": {"client_id", "client_secret"}, "github": {...}}`; either provider may be absent.
    pub fn from_json(json: Value, public_url: &str) -> anyhow::Result<Clients> {
        Ok(Clients {
            google_client: Self::client(&json, ClientProvider::Google, public_url)?,
            github_client: Self::client(&json, ClientProvider::Github, public_url)?,
        })
    }

    fn client(json: &Value, provider: ClientProvider, public_url: &str) -> anyhow::Result<Option<HappyClient>> {
        let Some(json) = json.get(provider.id()) else {
            tracing::info!("no {provider} keys, {provider} sign-in disabled");
            return Ok(None);
        };

        let client_id = ClientId::new(json.get_str_field("client_id")?);
        let client_secret = ClientSecret::new(json.get_str_field("client_secret")?);

        let (auth_url, token_url) = provider.endpoints();
        let redirect_url = RedirectUrl::new(format!("{public_url}/lockin/{}", provider.id()))?;

        Ok(Some(
            BasicClient::new(client_id)
                .set_client_secret(client_secret)
                .set_auth_uri(AuthUrl::new(auth_url.to_owned())?)
                .set_token_uri(TokenUrl::new(token_url.to_owned())?)
                .set_redirect_uri(redirect_url),
        ))
    }

    pub fn get_client(&self, provider: ClientProvider) -> anyhow::Result<HappyClient> {
        use ClientProvider::*;
        match provider {
            Google => self.google_client.clone(),
            Github => self.github_client.clone(),
        }
        .ok_or_else(|| anyhow!("OAuth provider {provider} keys not supplied"))
    }
}
