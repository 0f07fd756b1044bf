//! Chat model seam used by [`crate::answer`].

use std::{future::Future, pin::Pin};

use ai_llm_service::OpenAiService;

use crate::error::ContextorError;

/// Single-turn chat completion: one system message, one user message.
pub trait ChatModel: Send + Sync {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>>;
}

impl ChatModel for OpenAiService {
    fn complete<'a>(
        &'a self,
        system: &'a str,
        user: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, ContextorError>> + Send + 'a>> {
        Box::pin(async move {
            let text = self.generate(user, Some(system)).await?;
            Ok(text)
        })
    }
}
