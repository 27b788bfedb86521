use crate::api::API;
use crate::errors::{AdapterError, Result, VenueErrorBody};
use crate::util::{get_timestamp, sign_query};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT},
    Client as ReqwestClient, Response as ReqwestResponse, StatusCode,
};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::{interval, Duration, Interval};

/// Thin wrapper over `reqwest` that knows how to sign a Binance USDM
/// futures request and decode its typed response or error body.
#[derive(Clone)]
pub struct Client {
    api_key: String,
    secret_key: String,
    host: String,
    inner_client: ReqwestClient,
}

impl Client {
    pub fn new(api_key: Option<String>, secret_key: Option<String>, host: String) -> Self {
        Client {
            api_key: api_key.unwrap_or_default(),
            secret_key: secret_key.unwrap_or_default(),
            host,
            inner_client: ReqwestClient::builder()
                .pool_idle_timeout(None)
                .build()
                .expect("reqwest client builder never fails with this config"),
        }
    }

    pub async fn get<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        query: Option<String>,
    ) -> Result<T> {
        let mut url = format!("{}{}", self.host, String::from(endpoint));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(&query);
        }
        let response = self.inner_client.get(url).headers(self.base_headers()?).send().await?;
        self.handler(response).await
    }

    /// Signs `query` (recvWindow/timestamp are expected to already be
    /// present) and performs a GET.
    pub async fn get_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        let signed_query = self.sign(recv_window, query.unwrap_or_default());
        let url = format!("{}{}?{}", self.host, String::from(endpoint), signed_query);
        let response = self.inner_client.get(url).headers(self.base_headers()?).send().await?;
        self.handler(response).await
    }

    pub async fn post_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        let signed_query = self.sign(recv_window, query.unwrap_or_default());
        let url = format!("{}{}?{}", self.host, String::from(endpoint), signed_query);
        let response = self.inner_client.post(url).headers(self.base_headers()?).send().await?;
        self.handler(response).await
    }

    pub async fn put_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        let signed_query = self.sign(recv_window, query.unwrap_or_default());
        let url = format!("{}{}?{}", self.host, String::from(endpoint), signed_query);
        let response = self.inner_client.put(url).headers(self.base_headers()?).send().await?;
        self.handler(response).await
    }

    pub async fn delete_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        let signed_query = self.sign(recv_window, query.unwrap_or_default());
        let url = format!("{}{}?{}", self.host, String::from(endpoint), signed_query);
        let response = self.inner_client.delete(url).headers(self.base_headers()?).send().await?;
        self.handler(response).await
    }

    pub async fn post_unsigned<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        query: Option<String>,
    ) -> Result<T> {
        // listenKey acquisition only needs the API key header, not a signature.
        let mut url = format!("{}{}", self.host, String::from(endpoint));
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(&query);
        }
        let response = self.inner_client.post(url).headers(self.base_headers()?).send().await?;
        self.handler(response).await
    }

    fn sign(&self, recv_window: u64, mut query: String) -> String {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!(
            "recvWindow={}&timestamp={}",
            recv_window,
            get_timestamp()
        ));
        let signature = sign_query(&self.secret_key, &query);
        query.push_str(&format!("&signature={}", signature));
        query
    }

    fn base_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("binance-futures-adapter"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key_header = HeaderName::from_static("x-mbx-apikey");
        headers.insert(key_header, HeaderValue::from_str(&self.api_key)?);
        Ok(headers)
    }

    async fn handler<T: DeserializeOwned + Send + 'static>(
        &self,
        response: ReqwestResponse,
    ) -> Result<T> {
        match response.status() {
            StatusCode::OK => Ok(response.json::<T>().await?),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let error: VenueErrorBody = response.json().await?;
                Err(AdapterError::VenueError(error))
            }
            status => Err(AdapterError::Network(format!(
                "received error response: {:?}",
                status
            ))),
        }
    }
}

/// Paces an inner `Client` at a flat rate, used for every non-order
/// endpoint per the venue's weight budget. Order placement bypasses this
/// and goes through the Dispatch Queue's own rolling windows instead.
pub struct RateLimitedClient {
    inner: Client,
    ticks: Mutex<Interval>,
}

impl RateLimitedClient {
    pub fn new(inner: Client, requests_per_second: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / requests_per_second as f64);
        RateLimitedClient {
            inner,
            ticks: Mutex::new(interval(period)),
        }
    }

    async fn wait_turn(&self) {
        self.ticks.lock().await.tick().await;
    }

    pub async fn get<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        query: Option<String>,
    ) -> Result<T> {
        self.wait_turn().await;
        self.inner.get(endpoint, query).await
    }

    pub async fn get_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        self.wait_turn().await;
        self.inner.get_signed(endpoint, recv_window, query).await
    }

    pub async fn post_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        self.wait_turn().await;
        self.inner.post_signed(endpoint, recv_window, query).await
    }

    pub async fn put_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        self.wait_turn().await;
        self.inner.put_signed(endpoint, recv_window, query).await
    }

    pub async fn delete_signed<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        recv_window: u64,
        query: Option<String>,
    ) -> Result<T> {
        self.wait_turn().await;
        self.inner.delete_signed(endpoint, recv_window, query).await
    }

    pub async fn post_unsigned<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: API,
        query: Option<String>,
    ) -> Result<T> {
        self.wait_turn().await;
        self.inner.post_unsigned(endpoint, query).await
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }
}
