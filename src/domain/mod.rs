mod contact_submission;
mod delivery_outcome;
mod email_address;
mod required_text;

pub use contact_submission::{ContactSubmission, SubmissionError, SubmissionSchema};
pub use delivery_outcome::*;
pub use email_address::EmailAddress;
pub use required_text::RequiredText;
