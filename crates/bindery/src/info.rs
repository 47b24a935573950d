//! Informational printing.

use std::io;
use tracing::trace;

use crate::context::CommandContext;

/// Whether informational text should be printed.
///
/// A command that declared `--silent` is governed by that flag alone;
/// otherwise machine-friendly output suppresses it.
pub fn should_print(ctx: &CommandContext) -> bool {
    match ctx.output.silent {
        Some(silent) => !silent,
        None => !ctx.output.machine_friendly,
    }
}

/// Prints `message` to the context's destination, newline terminated.
pub fn print_info(ctx: &CommandContext, message: &str) -> io::Result<()> {
    if !should_print(ctx) {
        trace!(command = ctx.command_name(), "info suppressed");
        return Ok(());
    }
    let mut text = message.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    ctx.destination().write_all(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::OutputSettings;
    use crate::output::Destination;

    fn context(silent: Option<bool>, machine_friendly: bool) -> (CommandContext, crate::output::Captured) {
        let (dest, captured) = Destination::capture();
        let ctx = CommandContext::new(vec![], dest).with_output(OutputSettings {
            silent,
            machine_friendly,
            ..OutputSettings::default()
        });
        (ctx, captured)
    }

    #[test]
    fn appends_newline_once() {
        let (ctx, captured) = context(None, false);
        print_info(&ctx, "done").unwrap();
        print_info(&ctx, "again\n").unwrap();
        assert_eq!(captured.contents(), "done\nagain\n");
    }

    #[test]
    fn machine_friendly_suppresses_without_silent_flag() {
        let (ctx, captured) = context(None, true);
        print_info(&ctx, "hidden").unwrap();
        assert_eq!(captured.contents(), "");
    }

    #[test]
    fn silent_flag_decides_when_declared() {
        let (ctx, captured) = context(Some(false), true);
        print_info(&ctx, "shown").unwrap();
        assert_eq!(captured.contents(), "shown\n");

        let (ctx, captured) = context(Some(true), false);
        print_info(&ctx, "hidden").unwrap();
        assert_eq!(captured.contents(), "");
    }
}
