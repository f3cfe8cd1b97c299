// Session endpoints
//
// The cloud keeps the session in a cookie set by `SignIn`; the client's
// cookie jar carries it on every later call.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::debug;

use crate::client::WirelessTagClient;
use crate::error::Error;
use crate::paths;

impl WirelessTagClient {
    /// Sign in with account email and password.
    ///
    /// `POST /ethAccount.asmx/SignIn` with `{"email": "...", "password": "..."}`.
    /// Any service fault is reported as [`Error::Authentication`].
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        debug!(email, "signing in");
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        match self.post(paths::SIGN_IN, &body).await {
            Ok(_) => Ok(()),
            Err(Error::Api { message, .. }) => Err(Error::Authentication { message }),
            Err(e) => Err(e),
        }
    }

    /// Whether the current session cookie is still accepted.
    ///
    /// `POST /ethAccount.asmx/IsSignedIn`
    pub async fn is_signed_in(&self) -> Result<bool, Error> {
        match self.post(paths::IS_SIGNED_IN, &json!({})).await {
            Ok(Value::Bool(b)) => Ok(b),
            Ok(other) => Err(Error::Deserialization {
                message: "expected a boolean".into(),
                body: other.to_string(),
            }),
            Err(Error::Authentication { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// End the session.
    ///
    /// `POST /ethAccount.asmx/SignOut`
    pub async fn sign_out(&self) -> Result<(), Error> {
        debug!("signing out");
        let _ = self.post(paths::SIGN_OUT, &json!({})).await?;
        Ok(())
    }
}
