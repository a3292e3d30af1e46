mod gemini;
mod supabase;

pub use gemini::{GeminiClient, LlmError};
pub use supabase::{Direction, Query, SupabaseClient, SupabaseError, SupabaseResult};
