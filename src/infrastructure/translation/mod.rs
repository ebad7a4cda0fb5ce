mod aws_translator;
mod google_translator;

pub use aws_translator::AwsTranslator;
pub use google_translator::{DEFAULT_ENDPOINT, GoogleTranslator};
