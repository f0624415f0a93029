//! # synthesia-cli
//!
//! Batch-render videos from script documents with the
//! [Synthesia](https://www.synthesia.io) API and manage the rendered
//! collection from the command line.
//!
//! The `syn` binary is a thin positional front end over this library:
//! parse a [`Command`], build an [`AppConfig`], hand both to
//! [`app::execute`].
//!
//! ## Render one video from code
//!
//! ```no_run
//! use std::time::Duration;
//! use synthesia_cli::{Client, PollOptions, Presentation, SubmissionPayload};
//!
//! # async fn example() -> synthesia_cli::Result<()> {
//! let client = Client::new("your-api-key")?;
//!
//! let payload = SubmissionPayload::new("intro", "Hello world.", true, &Presentation::default());
//! let video = client.create_video(&payload).await?;
//!
//! let done = client
//!     .wait_for_completion(&video.id, &PollOptions::every(Duration::from_secs(30)))
//!     .await?;
//! println!("download from {:?}", done.download);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod batch;
pub mod catalog;
pub mod cli;
mod client;
pub mod config;
pub mod credentials;
pub mod download;
mod errors;
pub mod logging;
mod models;
pub mod prompt;
pub mod scripts;

pub use cli::Command;
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL};
pub use config::AppConfig;
pub use errors::{Result, SynthesiaError};
pub use models::{
    CatalogEntry, Captions, PollOptions, Presentation, ScriptInput, SubmissionPayload, Video,
    VideoRef, VideoStatus, Visibility,
};
pub use prompt::{Prompter, TerminalPrompter};
