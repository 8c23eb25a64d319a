pub type CmdResult<T> = slugswap::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod replace;

pub(crate) fn run_text(
    command: crate::Commands,
    _global: &GlobalArgs,
) -> slugswap::Result<(String, i32)> {
    match command {
        crate::Commands::Replace(args) => replace::run_text(args),
        _ => Err(slugswap::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support text output",
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (slugswap::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Replace(args) => dispatch!(args, global, replace),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
