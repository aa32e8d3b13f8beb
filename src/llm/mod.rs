//! LLM provider clients
//!
//! Two shapes: a direct Anthropic messages client (with streaming) and an
//! OpenRouter routing client sharing the same chat call surface.

mod anthropic;
mod openrouter;
mod types;

pub use anthropic::AnthropicClient;
pub use openrouter::{OpenRouterClient, OPENROUTER_KEY_NAMES};
pub use types::{ChatMessage, ChatOptions, ChatRole};
