//! Handler invocation and output routing.

use tracing::debug;

use crate::action::{Action, Returned};
use crate::bind::Frame;
use crate::context::CommandContext;
use crate::descriptor::Descriptor;
use crate::error::{ActionError, RenderError};
use crate::info::print_info;

/// Calls the handler and routes what it returned.
///
/// A non-nil error in the second output wins over anything in the first.
/// Text goes to the informational printer, objects to the output
/// dispatcher, and nil outputs print nothing.
pub fn invoke(
    action: &Action,
    frame: Frame,
    desc: &Descriptor,
    ctx: &CommandContext,
) -> Result<(), ActionError> {
    let returns = action.call(frame)?;
    if desc.no_returns || returns.is_empty() {
        return Ok(());
    }

    let mut returns = returns.into_iter();
    let first = returns.next();
    if desc.second_return_is_error {
        if let Some(Returned::Error(Some(err))) = returns.next() {
            debug!(command = ctx.command_name(), "handler returned an error");
            return Err(ActionError::Handler(err));
        }
    }

    match first {
        Some(Returned::Error(Some(err))) => {
            debug!(command = ctx.command_name(), "handler returned an error");
            Err(ActionError::Handler(err))
        }
        Some(Returned::Text(Some(text))) => {
            print_info(ctx, &text).map_err(RenderError::from)?;
            Ok(())
        }
        Some(Returned::Object(Some(object))) => {
            ctx.print_object(&*object)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::classify;
    use crate::output::{Captured, Destination};
    use crate::printable::Json;
    use crate::flags::OutputSettings;
    use crate::output::OutputMode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn run(action: Action) -> (Result<(), ActionError>, Captured) {
        let (dest, captured) = Destination::capture();
        let ctx = CommandContext::new(vec!["t".into()], dest).with_output(OutputSettings {
            mode: OutputMode::Json,
            pretty: false,
            ..OutputSettings::default()
        });
        let desc = classify(action.shape(), 0).unwrap();
        let result = invoke(&action, Frame::default(), &desc, &ctx);
        (result, captured)
    }

    #[test]
    fn no_output_handler_still_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (result, captured) = run(Action::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(captured.contents(), "");
    }

    #[test]
    fn error_only_handler() {
        let (result, captured) = run(Action::new(|| -> anyhow::Result<()> { Ok(()) }));
        assert!(result.is_ok());
        assert_eq!(captured.contents(), "");

        let (result, _) = run(Action::new(|| -> Result<(), std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "gone"))
        }));
        let err = result.unwrap_err().into_handler_error().unwrap();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn second_error_suppresses_object() {
        let (result, captured) = run(Action::new(|| -> anyhow::Result<Json<serde_json::Value>> {
            Err(anyhow::anyhow!("broker down"))
        }));
        assert_eq!(result.unwrap_err().to_string(), "broker down");
        assert_eq!(captured.contents(), "");
    }

    #[test]
    fn object_and_text_are_routed() {
        let (result, captured) = run(Action::new(|| Json(json!({"ok": true}))));
        assert!(result.is_ok());
        assert_eq!(captured.contents(), "{\"ok\":true}\n");

        let (result, captured) = run(Action::new(|| "hello".to_string()));
        assert!(result.is_ok());
        assert_eq!(captured.contents(), "hello\n");
    }

    #[test]
    fn nil_first_output_prints_nothing() {
        let (result, captured) = run(Action::new(|| None::<String>));
        assert!(result.is_ok());
        assert_eq!(captured.contents(), "");
    }
}
