mod transcribe_backend;

pub use transcribe_backend::AwsTranscribeBackend;
