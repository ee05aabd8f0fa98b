//! Interactive collection of run parameters.
//!
//! [`Prompter`] reads operator answers line by line and re-asks on invalid
//! input; nothing typed at a prompt is ever fatal. End of input at any
//! prompt ends the session quietly.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::directory::{DefaultDirs, resolve_custom_directory};
use super::{ConfigSource, RunConfig, SessionState, validate_count};
use crate::fetch::{AUDIO_EXTENSIONS, IMAGE_EXTENSIONS, TEXT_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::validate::is_valid_url;

/// Terminal-style [`ConfigSource`] over any line reader and writer.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
    defaults: DefaultDirs,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter reading from `input` and writing prompts to `output`.
    pub fn new(input: R, output: W, defaults: DefaultDirs) -> Self {
        Self {
            input,
            output,
            defaults,
        }
    }

    /// Consumes the prompter, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    /// Asks for the target URL until a valid one is entered.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading or writing.
    pub fn prompt_url(&mut self) -> io::Result<Option<String>> {
        loop {
            let Some(answer) = self.ask("Enter the API endpoint URL: ")? else {
                return Ok(None);
            };
            if is_valid_url(&answer) {
                return Ok(Some(answer));
            }
            self.say("Invalid URL format, please try again.")?;
        }
    }

    /// Asks for the request count until a number in `1..=1000` is entered.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading or writing.
    pub fn prompt_count(&mut self) -> io::Result<Option<u16>> {
        loop {
            let Some(answer) = self.ask("Number of requests (1-1000): ")? else {
                return Ok(None);
            };
            match answer.parse::<i64>() {
                Ok(value) => match validate_count(value) {
                    Ok(count) => return Ok(Some(count)),
                    Err(_) => self.say("The count must be between 1 and 1000.")?,
                },
                Err(_) => self.say("Please enter a valid number.")?,
            }
        }
    }

    /// Lists the supported formats and asks for a non-empty media type.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading or writing.
    pub fn prompt_media_hint(&mut self) -> io::Result<Option<String>> {
        self.say("Supported formats:")?;
        for (label, extensions) in [
            ("Image", IMAGE_EXTENSIONS),
            ("Video", VIDEO_EXTENSIONS),
            ("Audio", AUDIO_EXTENSIONS),
            ("Text", TEXT_EXTENSIONS),
        ] {
            self.say(&format!("  {label}: {}", extensions.join(", ")))?;
        }

        loop {
            let Some(answer) = self.ask("Media type (e.g. jpg/mp4/mp3/txt): ")? else {
                return Ok(None);
            };
            if !answer.is_empty() {
                return Ok(Some(answer.to_ascii_lowercase()));
            }
            self.say("The media type must not be empty.")?;
        }
    }

    /// Shows the directory menu and returns the chosen, existing directory.
    ///
    /// With a remembered directory that still exists the menu offers it first;
    /// otherwise it offers desktop, downloads, working directory or a custom path.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading or writing.
    pub fn select_directory(&mut self, state: &SessionState) -> io::Result<Option<PathBuf>> {
        loop {
            let choice = match state.last_save_dir().filter(|dir| dir.exists()) {
                Some(last) => self.remembered_menu(last)?,
                None => self.fresh_menu()?,
            };
            let Some(dir) = choice else {
                return Ok(None);
            };
            match std::fs::create_dir_all(&dir) {
                Ok(()) => return Ok(Some(dir)),
                Err(error) => {
                    self.say(&format!("Cannot create {}: {error}", dir.display()))?;
                }
            }
        }
    }

    fn remembered_menu(&mut self, last: &Path) -> io::Result<Option<PathBuf>> {
        self.say("")?;
        self.say("Save location:")?;
        self.say(&format!("  1) Last used directory: {}", last.display()))?;
        self.say("  2) Choose a new directory")?;
        self.say(&format!(
            "  3) Default directory: {}",
            self.defaults.downloads().display()
        ))?;

        loop {
            let Some(answer) = self.ask("Select (1/2/3): ")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => return Ok(Some(last.to_path_buf())),
                "2" => return self.custom_directory(),
                "3" => return Ok(Some(self.defaults.downloads().to_path_buf())),
                _ => self.say("Please enter a valid choice.")?,
            }
        }
    }

    fn fresh_menu(&mut self) -> io::Result<Option<PathBuf>> {
        self.say("")?;
        self.say("Save location:")?;
        self.say(&format!("  1) Desktop folder: {}", self.defaults.desktop().display()))?;
        self.say(&format!(
            "  2) Downloads folder: {}",
            self.defaults.downloads().display()
        ))?;
        self.say(&format!(
            "  3) Current directory: {}",
            self.defaults.current().display()
        ))?;
        self.say("  4) Custom directory")?;

        loop {
            let Some(answer) = self.ask("Select (1/2/3/4): ")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => return Ok(Some(self.defaults.desktop().to_path_buf())),
                "2" => return Ok(Some(self.defaults.downloads().to_path_buf())),
                "3" => return Ok(Some(self.defaults.current().to_path_buf())),
                "4" => return self.custom_directory(),
                _ => self.say("Please enter a valid choice.")?,
            }
        }
    }

    fn custom_directory(&mut self) -> io::Result<Option<PathBuf>> {
        self.say("")?;
        self.say("Enter a path, or 'desktop' / 'downloads' for the default folders.")?;
        loop {
            let Some(answer) = self.ask("Save directory: ")? else {
                return Ok(None);
            };
            if let Some(dir) = resolve_custom_directory(&answer, &self.defaults) {
                return Ok(Some(dir));
            }
            self.say("The directory must not be empty.")?;
        }
    }
}

impl<R: BufRead, W: Write> ConfigSource for Prompter<R, W> {
    fn next_run(&mut self, state: &SessionState) -> io::Result<Option<RunConfig>> {
        self.say("")?;
        self.say("Enter the run parameters:")?;

        let Some(url) = self.prompt_url()? else {
            return Ok(None);
        };
        let Some(count) = self.prompt_count()? else {
            return Ok(None);
        };
        let Some(media_hint) = self.prompt_media_hint()? else {
            return Ok(None);
        };
        let Some(save_dir) = self.select_directory(state)? else {
            return Ok(None);
        };

        debug!(%url, count, %media_hint, "run parameters collected");
        RunConfig::new(&url, count, &media_hint, save_dir)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }

    fn run_again(&mut self) -> io::Result<bool> {
        self.say("")?;
        self.say(&"-".repeat(30))?;
        let answer = self.ask("Run again? (y/n): ")?;
        Ok(answer.is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}
