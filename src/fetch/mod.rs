use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

pub fn make_client() -> reqwest::Client {
    Client::builder()
        .gzip(true)
        .build()
        .expect("client creation should succeed")
}

/// Downloads the menu page. A non-success status is an error, nothing is retried.
#[instrument(skip(client, url), fields(url = %url), level = Level::DEBUG)]
pub async fn menu_page(client: &reqwest::Client, url: &Url) -> Result<String, RequestError> {
    let start = std::time::Instant::now();
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let text = response.text().await?;
    log::trace!("Got text of menu page in \t {:?}", start.elapsed());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_page() {
        let client = make_client();
        // nothing listens on the discard port
        let url: Url = "http://127.0.0.1:9/pizzak.php"
            .parse()
            .expect("url should be valid");
        let err = menu_page(&client, &url).await.unwrap_err();
        assert!(err.is_connect() || err.is_request());
    }
}
