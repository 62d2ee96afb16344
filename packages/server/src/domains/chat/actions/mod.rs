mod relay;

pub use relay::{build_messages, relay_chat, ChatRelayRequest, ChatReply, IncomingMessage, SpeechPayload};
