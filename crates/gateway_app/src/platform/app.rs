use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use engine_logging::{engine_info, engine_warn};
use gateway_core::{update, AppState, FileSource, Msg, Route, SelectedFile};
use gateway_engine::{guess_content_type, EngineHandle};

use super::cli::{Cli, Command};
use super::effects::EffectRunner;
use super::persistence::SessionStore;
use super::ui::input::{parse_line, InputCommand, HELP};
use super::{logging, ui};

const TICK_INTERVAL: Duration = Duration::from_millis(75);

/// Everything the main loop reacts to.
pub enum LoopEvent {
    Msg(Msg),
    Input(String),
    InputClosed,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log).context("failed to initialize logging")?;

    let settings = cli.settings();
    engine_info!(
        "Starting gateway api={} push={}",
        settings.api_base_url,
        settings.push_endpoint
    );
    let engine = EngineHandle::new(settings).context("failed to start upload engine")?;
    let store = SessionStore::new(cli.session_dir());
    let restored = store.load();

    let (events_tx, events_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(engine, store, events_tx.clone());
    let mut app = App {
        state: AppState::new(),
        runner,
    };
    if !restored.is_empty() {
        app.dispatch(Msg::SessionRestored(restored));
    }

    // Background tick to age notifications.
    let tick_tx = events_tx.clone();
    thread::spawn(move || {
        while tick_tx.send(LoopEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let result = match cli.command {
        Some(Command::Upload {
            package,
            name,
            description,
            tags,
        }) => {
            let form = ScriptedForm {
                package: &package,
                name,
                description,
                tags,
            };
            app.run_scripted(form, &events_rx)
        }
        None => {
            spawn_stdin_reader(events_tx);
            app.run_interactive(&events_rx)
        }
    };

    // The session ends with the process.
    if let Err(err) = app.runner.store().clear() {
        engine_warn!("Failed to remove session file: {}", err);
    }
    result
}

struct ScriptedForm<'a> {
    package: &'a Path,
    name: Option<String>,
    description: String,
    tags: String,
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    /// Runs one message through `update` and its effects. Returns whether the
    /// view changed.
    fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        was_dirty
    }

    fn draw(&self, prompt: bool) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out)?;
        for line in ui::render::render(&self.state.view()) {
            writeln!(out, "{line}")?;
        }
        if prompt {
            write!(out, "> ")?;
        }
        out.flush()
    }

    fn run_interactive(&mut self, events: &mpsc::Receiver<LoopEvent>) -> anyhow::Result<()> {
        self.draw(true)?;
        while let Ok(event) = events.recv() {
            let redraw = match event {
                LoopEvent::Msg(msg) => self.dispatch(msg),
                LoopEvent::Input(line) => match parse_line(&line) {
                    Ok(InputCommand::Quit) => break,
                    Ok(InputCommand::Help) => {
                        println!("{HELP}");
                        true
                    }
                    Ok(InputCommand::Redraw) => true,
                    Ok(command) => {
                        self.dispatch(command_to_msg(command));
                        true
                    }
                    Err(err) => {
                        println!("{err}");
                        true
                    }
                },
                LoopEvent::InputClosed => break,
            };
            if redraw {
                self.draw(true)?;
            }
        }
        Ok(())
    }

    /// Fills the upload form the way a user would, then follows the upload
    /// until the completion screen shows.
    fn run_scripted(
        &mut self,
        form: ScriptedForm<'_>,
        events: &mpsc::Receiver<LoopEvent>,
    ) -> anyhow::Result<()> {
        let file = selected_file(form.package)?;
        self.dispatch(Msg::Navigate(Route::Tools));
        self.dispatch(Msg::ToolSelected("articulate".to_string()));
        self.dispatch(Msg::FileSelected {
            file,
            source: FileSource::Picker,
        });
        if let Some(name) = form.name {
            self.dispatch(Msg::NameChanged(name));
        }
        self.dispatch(Msg::DescriptionChanged(form.description));
        self.dispatch(Msg::TagsChanged(form.tags));
        self.dispatch(Msg::SubmitClicked);

        if *self.state.route() != Route::Processing {
            let reasons: Vec<String> = self
                .state
                .view()
                .notifications
                .iter()
                .map(|n| format!("{}: {}", n.title, n.description))
                .collect();
            bail!("upload was not started ({})", reasons.join("; "));
        }
        self.draw(false)?;

        while let Ok(event) = events.recv() {
            let LoopEvent::Msg(msg) = event else {
                continue;
            };
            let failure = match &msg {
                Msg::UploadFailed { submission, reason }
                    if self.state.submission() == Some(*submission) =>
                {
                    Some(format!("upload failed: {reason}"))
                }
                Msg::ChannelClosed {
                    connection, reason, ..
                } if self.state.channel().connection() == Some(*connection) => {
                    Some(match reason {
                        Some(reason) => format!("processing updates lost: {reason}"),
                        None => "processing updates ended before completion".to_string(),
                    })
                }
                _ => None,
            };
            let dirty = self.dispatch(msg);
            if let Some(failure) = failure {
                if !self.finished() {
                    return Err(anyhow!(failure));
                }
            }
            if dirty {
                self.draw(false)?;
            }
            if *self.state.route() == Route::Complete {
                return Ok(());
            }
        }
        bail!("event loop ended before processing completed")
    }

    fn finished(&self) -> bool {
        *self.state.route() == Route::Complete
            || self.state.status().is_some_and(|status| status.is_finished())
    }
}

fn command_to_msg(command: InputCommand) -> Msg {
    match command {
        InputCommand::Go(route) => Msg::Navigate(route),
        InputCommand::Tool(id) => Msg::ToolSelected(id),
        InputCommand::File { path, source } => match selected_file(&path) {
            Ok(file) => Msg::FileSelected { file, source },
            Err(err) => Msg::ActionFailed {
                title: "Could not read file".to_string(),
                description: format!("{err:#}"),
            },
        },
        InputCommand::RemoveFile => Msg::RemoveFileClicked,
        InputCommand::Name(text) => Msg::NameChanged(text),
        InputCommand::Description(text) => Msg::DescriptionChanged(text),
        InputCommand::Tags(text) => Msg::TagsChanged(text),
        InputCommand::Submit => Msg::SubmitClicked,
        InputCommand::Copy => Msg::CopyLinkClicked,
        InputCommand::Open => Msg::OpenLinkClicked,
        InputCommand::Dismiss => Msg::DismissNotifications,
        InputCommand::Help | InputCommand::Quit | InputCommand::Redraw => Msg::NoOp,
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(LoopEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(LoopEvent::InputClosed);
    });
}

fn selected_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let metadata =
        fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(SelectedFile {
        name,
        size: metadata.len(),
        content_type: guess_content_type(path),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn selected_file_reads_size_and_type() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Course Pack.zip");
        fs::write(&path, vec![0u8; 1536]).unwrap();

        let file = selected_file(&path).unwrap();
        assert_eq!(file.name, "Course Pack.zip");
        assert_eq!(file.size, 1536);
        assert_eq!(file.content_type.as_deref(), Some("application/zip"));
        assert_eq!(file.path, path);
    }

    #[test]
    fn selected_file_rejects_directories_and_missing_paths() {
        let temp = TempDir::new().unwrap();
        assert!(selected_file(temp.path()).is_err());
        assert!(selected_file(&temp.path().join("missing.zip")).is_err());
    }
}
