use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes prepared HTTP requests. Decorators implement this over an inner
/// client to inject credentials or other request mutations.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
