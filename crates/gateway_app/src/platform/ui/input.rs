//! Line commands typed at the prompt.

use std::path::PathBuf;

use gateway_core::{FileSource, Route};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Go(Route),
    Tool(String),
    File { path: PathBuf, source: FileSource },
    RemoveFile,
    Name(String),
    Description(String),
    Tags(String),
    Submit,
    Copy,
    Open,
    Dismiss,
    Help,
    Quit,
    /// Blank line; just redraws.
    Redraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
Commands:
  home | tools | go <path>     navigate (/, /tools, /articulate, /processing, /complete)
  tool <id>                    open a tool from the catalog
  file <path> | drop <path>    choose a .zip package
  rm                           remove the chosen file
  name|desc|tags <text>        edit the upload form
  submit                       start the upload
  copy | open                  copy or open the content link
  dismiss                      clear notifications
  help | quit";

pub fn parse_line(line: &str) -> Result<InputCommand, InputError> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_ascii_lowercase().as_str() {
        "" => InputCommand::Redraw,
        "home" | "dashboard" => InputCommand::Go(Route::Dashboard),
        "tools" => InputCommand::Go(Route::Tools),
        "go" => InputCommand::Go(Route::parse(required(rest, "go")?)),
        "tool" => InputCommand::Tool(required(rest, "tool")?.to_string()),
        "file" => InputCommand::File {
            path: PathBuf::from(required(rest, "file")?),
            source: FileSource::Picker,
        },
        "drop" => InputCommand::File {
            path: PathBuf::from(required(rest, "drop")?),
            source: FileSource::Drop,
        },
        "rm" | "remove" => InputCommand::RemoveFile,
        "name" => InputCommand::Name(rest.to_string()),
        "desc" | "description" => InputCommand::Description(rest.to_string()),
        "tags" => InputCommand::Tags(rest.to_string()),
        "submit" | "upload" => InputCommand::Submit,
        "copy" => InputCommand::Copy,
        "open" => InputCommand::Open,
        "dismiss" => InputCommand::Dismiss,
        "help" | "?" => InputCommand::Help,
        "quit" | "exit" | "q" => InputCommand::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required<'a>(rest: &'a str, keyword: &'static str) -> Result<&'a str, InputError> {
    if rest.is_empty() {
        Err(InputError::MissingArgument(keyword))
    } else {
        Ok(rest)
    }
}
