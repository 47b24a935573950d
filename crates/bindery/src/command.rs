//! Command wiring.
//!
//! A [`Command`] ties a handler to its declared options and builds the
//! clap command for them. An [`App`] groups commands as subcommands and
//! shares app state and table printers between them.
//!
//! ```rust
//! use bindery::{Args, Command, Destination, OptionSpec};
//!
//! let echo = Command::new("echo")
//!     .option(OptionSpec::of::<bool>("upper"))
//!     .printing_info()
//!     .action(|upper: bool, args: Args| {
//!         let text = args.join(" ");
//!         if upper { text.to_uppercase() } else { text }
//!     });
//!
//! let (dest, captured) = Destination::capture();
//! echo.execute(["echo", "--upper", "hi", "there"], dest)?;
//! assert_eq!(captured.contents(), "HI THERE\n");
//! # Ok::<(), bindery::ActionError>(())
//! ```

use clap::{Arg, ArgAction, ArgMatches};
use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::Arc;
use tracing::debug;

use crate::action::{Action, IntoAction};
use crate::checks::{check_args_range, check_required_flags};
use crate::context::{CommandContext, Extensions};
use crate::error::{ActionError, CodedError};
use crate::flags::{self, OutputSettings};
use crate::option::{LiveOptions, OptionSpec, Options};
use crate::output::Destination;
use crate::table::PrinterCache;

const POSITIONAL: &str = "__positional";

/// A command: options, handler and output behavior.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    about: Option<String>,
    example: Option<String>,
    options: Options,
    action: Option<Action>,
    prints_objects: bool,
    prints_info: bool,
    args_range: Option<(usize, usize)>,
    required: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            example: None,
            options: Options::new(),
            action: None,
            prints_objects: false,
            prints_info: false,
            args_range: None,
            required: Vec::new(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Example invocation, shown in help and appended to the error when
    /// every required flag is missing.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = OptionSpec>) -> Self {
        for spec in options {
            self.options.push(spec);
        }
        self
    }

    pub fn action<M>(mut self, handler: impl IntoAction<M>) -> Self {
        self.action = Some(handler.into_action());
        self
    }

    /// Adds the structured output flags (`--output`, `--query`, ...).
    pub fn printing_objects(mut self) -> Self {
        self.prints_objects = true;
        self
    }

    /// Adds `--silent`.
    pub fn printing_info(mut self) -> Self {
        self.prints_info = true;
        self
    }

    /// Positional argument bounds; a `max` of zero means unbounded.
    pub fn args_range(mut self, min: usize, max: usize) -> Self {
        self.args_range = Some((min, max));
        self
    }

    /// Marks a declared option as required at run time.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> &Options {
        &self.options
    }

    pub fn handler(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Builds the clap command.
    ///
    /// Standard flags whose name is already taken by a declared option are
    /// left out.
    pub fn to_clap(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone());
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        if let Some(example) = &self.example {
            cmd = cmd.after_help(format!("Example:\n  {}", example));
        }
        cmd = self.options.augment(cmd);

        let mut standard = Vec::new();
        if self.prints_objects {
            standard.extend(flags::object_args());
        }
        if self.prints_info {
            standard.push(flags::silent_arg());
        }
        standard.push(flags::machine_friendly_arg());
        for arg in standard {
            if self.options.get(arg.get_id().as_str()).is_none() {
                cmd = cmd.arg(arg);
            }
        }

        cmd.arg(
            Arg::new(POSITIONAL)
                .value_name("ARGS")
                .num_args(0..)
                .action(ArgAction::Append),
        )
    }

    /// Parses `argv` (program name first) and runs the command.
    pub fn execute<I, T>(&self, argv: I, destination: Destination) -> Result<(), ActionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.to_clap().try_get_matches_from(argv)?;
        let ctx = CommandContext::new(vec![self.name.clone()], destination);
        self.run_matches(&matches, ctx)
    }

    /// Runs against already parsed matches.
    pub fn run_matches(&self, matches: &ArgMatches, ctx: CommandContext) -> Result<(), ActionError> {
        let args: Vec<String> = matches
            .try_get_many::<String>(POSITIONAL)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        if let Some((min, max)) = self.args_range {
            check_args_range(&self.name, args.len(), min, max)?;
        }

        let live = LiveOptions::new(&self.options, matches);
        if !self.required.is_empty() {
            check_required_flags(&live, &self.required, self.example.as_deref())?;
        }

        let Some(action) = &self.action else {
            debug!(command = %self.name, "no handler");
            return Ok(());
        };
        let ctx = ctx.with_output(OutputSettings::from_matches(matches));
        action.run(&ctx, &live, &args)
    }
}

/// A set of commands run as subcommands of one program.
#[derive(Debug, Clone)]
pub struct App {
    name: String,
    about: Option<String>,
    commands: Vec<Command>,
    app_state: Arc<Extensions>,
    printers: Arc<PrinterCache>,
    friendly_errors: HashMap<i32, String>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            commands: Vec::new(),
            app_state: Arc::new(Extensions::new()),
            printers: Arc::new(PrinterCache::new()),
            friendly_errors: HashMap::new(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// State shared read-only with every handler through the context.
    pub fn app_state(mut self, state: Extensions) -> Self {
        self.app_state = Arc::new(state);
        self
    }

    /// Reports `message` in place of any handler [`CodedError`] with `code`.
    pub fn friendly_error(mut self, code: i32, message: impl Into<String>) -> Self {
        self.friendly_errors.insert(code, message.into());
        self
    }

    pub fn to_clap(&self) -> clap::Command {
        let mut cmd = clap::Command::new(self.name.clone())
            .subcommand_required(true)
            .arg_required_else_help(true);
        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }
        cmd.subcommands(self.commands.iter().map(Command::to_clap))
    }

    /// Parses `argv` and runs the selected command.
    pub fn run<I, T>(&self, argv: I, destination: Destination) -> Result<(), ActionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.to_clap().try_get_matches_from(argv)?;
        let path = command_path(&matches);
        let Some(command) = path
            .last()
            .and_then(|name| self.commands.iter().find(|c| c.name() == name.as_str()))
        else {
            return Ok(());
        };

        debug!(command = %path.join("."), "dispatching");
        let ctx = CommandContext::new(path.clone(), destination)
            .with_app_state(Arc::clone(&self.app_state))
            .with_printers(Arc::clone(&self.printers));
        command
            .run_matches(deepest_matches(&matches), ctx)
            .map_err(|err| self.acknowledge(err))
    }

    fn acknowledge(&self, err: ActionError) -> ActionError {
        let ActionError::Handler(inner) = err else {
            return err;
        };
        let friendly = inner
            .chain()
            .find_map(|cause| cause.downcast_ref::<CodedError>())
            .and_then(|coded| {
                let message = self.friendly_errors.get(&coded.code())?;
                debug!(code = coded.code(), "replacing coded error");
                Some(message.clone())
            });
        match friendly {
            Some(message) => ActionError::Handler(anyhow::Error::msg(message)),
            None => ActionError::Handler(inner),
        }
    }
}

/// Names along the subcommand chain, e.g. `["topics", "list"]`.
fn command_path(matches: &ArgMatches) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        if name == "help" {
            break;
        }
        path.push(name.to_string());
        current = sub;
    }
    path
}

fn deepest_matches(matches: &ArgMatches) -> &ArgMatches {
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        if name == "help" {
            break;
        }
        current = sub;
    }
    current
}
