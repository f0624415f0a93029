//! Positional command line: `syn [flag] [arg] [arg]`.

use crate::catalog::StatusFilter;
use crate::errors::{Result, SynthesiaError};
use crate::models::VideoRef;

pub const USAGE: &str = "\
usage: syn                       render every script in scripts/
       syn -a <api key>          store the API key
       syn -l [N|/progress|/complete]
                                 list videos
       syn -i <index|id>         inspect a video
       syn -ia <index|id>        print a video's raw JSON
       syn -u <index|id> <title> rename a video
       syn -r <index|id>         delete a video (asks first)
       syn -d <index|id>         download a video and its captions
       syn -e <index|id>         make public and print the embed code
       syn -x <index|id>         make private
       syn -t <title> [script]   quick test render";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListArgs {
    /// List with an explicit or default page size.
    Limit(Option<u32>),
    Filtered(StatusFilter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Batch,
    StoreApiKey(String),
    List(ListArgs),
    Inspect(VideoRef),
    InspectRaw(VideoRef),
    Rename { target: VideoRef, title: String },
    Delete(VideoRef),
    Download(VideoRef),
    Publish(VideoRef),
    MakePrivate(VideoRef),
    QuickRender { title: String, script: Option<String> },
}

impl Command {
    /// Parse the arguments after the program name.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Command> {
        let arg = |i: usize| args.get(i).map(|s| s.as_ref()).filter(|s| !s.is_empty());
        let target = || -> Result<VideoRef> {
            arg(1)
                .ok_or_else(|| usage("video index is missing"))?
                .parse::<VideoRef>()
        };

        let Some(flag) = arg(0) else {
            return Ok(Command::Batch);
        };

        let command = match flag {
            "-a" => Command::StoreApiKey(
                arg(1)
                    .ok_or_else(|| usage("API key missing"))?
                    .to_string(),
            ),
            "-l" => Command::List(match arg(1) {
                None => ListArgs::Limit(None),
                Some("/progress") => ListArgs::Filtered(StatusFilter::InProgress),
                Some("/complete") => ListArgs::Filtered(StatusFilter::Complete),
                Some(n) => ListArgs::Limit(Some(
                    n.parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| usage(&format!("invalid list size \"{n}\"")))?,
                )),
            }),
            "-i" => Command::Inspect(target()?),
            "-ia" => Command::InspectRaw(target()?),
            "-u" => {
                let target = target()?;
                let title = arg(2).ok_or_else(|| usage("new title of video is missing"))?;
                Command::Rename {
                    target,
                    title: title.to_string(),
                }
            }
            "-r" => Command::Delete(target()?),
            "-d" => Command::Download(target()?),
            "-e" => Command::Publish(target()?),
            "-x" => Command::MakePrivate(target()?),
            "-t" => Command::QuickRender {
                title: arg(1)
                    .ok_or_else(|| usage("video title is missing"))?
                    .to_string(),
                script: arg(2).map(|s| s.to_string()),
            },
            other => return Err(usage(&format!("unknown command \"{other}\""))),
        };

        Ok(command)
    }
}

fn usage(message: &str) -> SynthesiaError {
    SynthesiaError::Usage(format!("{message}\n{USAGE}"))
}
