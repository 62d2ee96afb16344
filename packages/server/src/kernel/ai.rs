// AI implementation using OpenAI
//
// Infrastructure implementation of BaseAI. What to prompt for lives in the chat domain.

use async_trait::async_trait;
use openai_client::{
    ChatRequest, ChatResponse, OpenAIClient, OpenAIError, SpeechRequest, SpeechResponse,
};

use super::BaseAI;

#[async_trait]
impl BaseAI for OpenAIClient {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError> {
        OpenAIClient::chat_completion(self, request).await
    }

    async fn create_speech(&self, request: SpeechRequest) -> Result<SpeechResponse, OpenAIError> {
        OpenAIClient::create_speech(self, request).await
    }
}
