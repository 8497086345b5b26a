//! pomodoro-pet main entrypoint.

use pomodoro_pet::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
