use crate::core::environment::Environment;
use crate::core::player::{LogSink, ProcessSink};
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::info;
use tracing::debug;

/// Start the interactive session and block until it ends.
pub fn handle(env: Environment) -> AppResult<()> {
    info(format!(
        "pomodoro-pet {} (type ? for commands)",
        env!("CARGO_PKG_VERSION")
    ));
    match ProcessSink::detect(&env) {
        Some(sink) => Session::new(env, sink).run(),
        None => {
            debug!("no audio player, clips are only logged");
            Session::new(env, LogSink::new()).run()
        }
    }
}
