// src/client.rs

use crate::{config::AppConfig, error::*};
use log::debug;
use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Serialize;
use url::Url;

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
}

impl RobustClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(
            reqwest::Client::builder()
                .user_agent(config.user_agent.clone())
                .connect_timeout(config.connect_timeout)
                .timeout(config.timeout)
                .build()?,
        )
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

        Ok(Self { client })
    }

    pub async fn get(&self, url: Url) -> AppResult<Response> {
        debug!("GET {}", redact(&url));
        let res = self.client.get(url).send().await?;
        Self::check_status(res)
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> AppResult<Response> {
        debug!("PUT {}", redact(&url));
        let res = self.client.put(url).json(body).send().await?;
        Self::check_status(res)
    }

    pub async fn patch_json<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> AppResult<Response> {
        debug!("PATCH {}", redact(&url));
        let res = self.client.patch(url).json(body).send().await?;
        Self::check_status(res)
    }

    fn check_status(res: Response) -> AppResult<Response> {
        if res.status() == StatusCode::UNAUTHORIZED || res.status() == StatusCode::FORBIDDEN {
            return Err(AppError::AuthRejected);
        }
        Ok(res.error_for_status()?)
    }
}

// 日志中不记录凭据
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    if url.query_pairs().any(|(k, _)| k == "auth") {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "auth" { "***".to_string() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        shown.query_pairs_mut().clear().extend_pairs(kept);
    }
    shown.to_string()
}
