use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};

use novinki_core::http::{HttpEvent, HttpResponse};

use crate::handler::Handler;

/// Serve events from the serverless runtime until it shuts the process down.
///
/// The handler is built once at cold start and shared by every invocation.
pub async fn run(handler: Arc<Handler>) -> Result<(), Error> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<HttpEvent>| {
        let handler = Arc::clone(&handler);
        async move {
            tracing::debug!(request_id = %event.context.request_id, "invocation");
            Ok::<HttpResponse, Error>(handler.respond(&event.payload).await)
        }
    }))
    .await
}
