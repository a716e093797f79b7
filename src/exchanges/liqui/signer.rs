use crate::core::errors::ExchangeError;
use crate::core::kernel::{
    param_to_string, urlencode, HmacDigest, HmacSigner, HttpRequest, PreparedRequest, Signer,
};
use secrecy::Secret;

/// Signs trade-API calls: the endpoint name travels in the form body as
/// `method`, next to a nonce, and the whole body is HMAC-SHA512'd
#[derive(Debug)]
pub struct LiquiSigner {
    hmac: HmacSigner,
}

impl LiquiSigner {
    pub fn new(api_key: String, secret_key: Secret<String>) -> Self {
        Self {
            hmac: HmacSigner::new(api_key, secret_key, HmacDigest::Sha512),
        }
    }

    pub fn sign(
        &self,
        prepared: &PreparedRequest,
        url: &str,
    ) -> Result<HttpRequest, ExchangeError> {
        let nonce = self.hmac.nonce()?;
        let body = Self::form_body(nonce, prepared);

        let mut headers = self.hmac.sign_request(&body)?;
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );

        Ok(HttpRequest {
            method: prepared.method.clone(),
            url: url.to_string(),
            headers,
            body: Some(body),
        })
    }

    fn form_body(nonce: u64, prepared: &PreparedRequest) -> String {
        let leading = [
            ("nonce", nonce.to_string()),
            ("method", prepared.path.clone()),
        ];
        let rest = prepared
            .query
            .iter()
            .filter(|(key, _)| key.as_str() != "nonce" && key.as_str() != "method")
            .map(|(key, value)| (key.as_str(), param_to_string(value)));
        urlencode(leading.into_iter().chain(rest))
    }
}
