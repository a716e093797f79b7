use crate::core::descriptor::{Descriptor, Tier};
use crate::core::errors::ExchangeError;
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Parameters of a logical API call
pub type Params = Map<String, Value>;

/// A fully assembled request, ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// A call resolved against the descriptor but not yet signed or encoded
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub tier: Tier,
    pub method: Method,
    /// The endpoint template as registered, e.g. `ticker/{pair}`
    pub endpoint: String,
    /// The template with placeholders substituted, e.g. `ticker/btc_usd`
    pub path: String,
    /// Parameters left over after placeholder substitution
    pub query: Params,
    pub requires_auth: bool,
}

/// Names of the `{param}` placeholders in `template`, in order
pub fn extract_params(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Render a parameter the way it appears on the wire
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Substitute every `{param}` in `template` from `params`
pub fn implode_params(template: &str, params: &Params) -> Result<String, ExchangeError> {
    let mut path = template.to_string();
    for name in extract_params(template) {
        let value = params.get(name).ok_or_else(|| {
            ExchangeError::InvalidParameters(format!(
                "endpoint '{}' requires parameter '{}'",
                template, name
            ))
        })?;
        path = path.replace(&format!("{{{}}}", name), &param_to_string(value));
    }
    Ok(path)
}

/// `application/x-www-form-urlencoded` rendering of ordered pairs
pub fn urlencode<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Query-string rendering of leftover parameters
pub fn urlencode_params(params: &Params) -> String {
    urlencode(params.iter().map(|(k, v)| (k.as_str(), param_to_string(v))))
}

/// Resolves logical calls against a descriptor's `api` section
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    descriptor: &'a Descriptor,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(descriptor: &'a Descriptor) -> Self {
        Self { descriptor }
    }

    /// Look up `endpoint` under `api[tier][method]` and substitute its placeholders.
    ///
    /// Private-tier calls come back with `requires_auth` set; how they are
    /// signed is up to the exchange family.
    pub fn prepare(
        &self,
        tier: Tier,
        method: Method,
        endpoint: &str,
        params: Params,
    ) -> Result<PreparedRequest, ExchangeError> {
        if !self.descriptor.endpoints(tier, &method)?.contains(&endpoint) {
            return Err(ExchangeError::ConfigurationError(format!(
                "{} has no {} {} endpoint '{}'",
                self.descriptor.id().unwrap_or("exchange"),
                tier,
                method,
                endpoint
            )));
        }

        let path = implode_params(endpoint, &params)?;
        let consumed = extract_params(endpoint);
        let query = params
            .into_iter()
            .filter(|(key, _)| !consumed.contains(&key.as_str()))
            .collect();

        Ok(PreparedRequest {
            tier,
            method,
            endpoint: endpoint.to_string(),
            path,
            query,
            requires_auth: tier == Tier::Private,
        })
    }

    /// `{base}/{version}/{path}[?query]`, the public-tier URL layout
    pub fn versioned_url(&self, prepared: &PreparedRequest) -> Result<String, ExchangeError> {
        let base = self.descriptor.api_base(prepared.tier)?;
        let mut url = match self.descriptor.version() {
            Ok(version) => format!("{}/{}/{}", base, version, prepared.path),
            Err(_) => format!("{}/{}", base, prepared.path),
        };
        if !prepared.query.is_empty() {
            url.push('?');
            url.push_str(&urlencode_params(&prepared.query));
        }
        Ok(url)
    }
}
