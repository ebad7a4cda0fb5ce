mod gooey_client;

pub use gooey_client::{DEFAULT_BASE_URL, GooeyLipsyncClient};
