/// Kernel - exchange-agnostic request plumbing
///
/// The kernel turns logical API calls into bytes on the wire and back. It
/// knows nothing about any particular exchange beyond what the descriptor
/// says.
///
/// ## Components
/// - `RequestBuilder`: resolves `(tier, method, endpoint, params)` against a
///   descriptor's `api` section and substitutes `{param}` placeholders
/// - `Signer`: pluggable authentication; `HmacSigner` covers the HMAC families
/// - `RestClient`: transport; `ReqwestRest` adds timeouts and retries on
///   connection failures
///
/// ## Example
/// ```rust,no_run
/// use lotusx_liqui::core::kernel::*;
/// use lotusx_liqui::exchanges::wex::Wex;
/// use lotusx_liqui::core::traits::Exchange;
/// use lotusx_liqui::core::descriptor::Tier;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let wex = Wex::public()?;
/// let mut params = Params::new();
/// params.insert("pair".to_string(), "btc_usd".into());
/// let request = wex.build_request(Tier::Public, reqwest::Method::GET, "ticker/{pair}", params)?;
///
/// let rest = RestClientBuilder::new(RestClientConfig::new("wex".to_string())).build()?;
/// let response = rest.execute(&request).await?;
/// println!("{}", response.body);
/// # Ok(())
/// # }
/// ```
pub mod request;
pub mod rest;
pub mod signer;

pub use request::{
    extract_params, implode_params, param_to_string, urlencode, urlencode_params, HttpRequest,
    Params, PreparedRequest, RequestBuilder,
};
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{HmacDigest, HmacSigner, SignatureResult, Signer};
