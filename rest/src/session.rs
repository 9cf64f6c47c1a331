use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
#[cfg(feature = "mock_auth")]
use service::permission::MockContext;

#[cfg(not(feature = "mock_auth"))]
compile_error!("An authentication feature is required, enable `mock_auth`.");

/// Authentication context attached to every request.
#[cfg(feature = "mock_auth")]
pub type Context = MockContext;

/// Attaches the [`Context`] to the request extensions.
#[cfg(feature = "mock_auth")]
pub async fn context_extractor(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(MockContext);
    next.run(request).await
}
