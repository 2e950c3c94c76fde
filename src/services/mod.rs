pub mod generation;
pub mod search;

pub use generation::{GeminiClient, TextGenerator};
pub use search::{SearchProvider, SerpApiClient};
