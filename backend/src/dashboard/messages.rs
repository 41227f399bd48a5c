//! User-visible texts rendered in the output block.

pub const EMPTY_QUESTION: &str = "Please enter a question.";

pub const STORAGE_NOT_CONFIGURED: &str =
    "Configuration error: the Supabase URL or anon key is missing.";

pub const COMPLETION_NOT_CONFIGURED: &str = "Configuration error: the OpenAI API key is missing.";

pub const NO_RESPONSE: &str = "No response from Kairos.";

pub const REMOTE_ERROR: &str = "Kairos could not answer right now. Please try again.";

pub const UNEXPECTED_ERROR: &str = "Something went wrong while contacting Kairos.";

pub const BUTTON_IDLE: &str = "Ask Kairos";

pub const BUTTON_BUSY: &str = "Thinking…";
