use husk::repl::{init_state, run_once};

fn main() {
    init_logging();
    let interactive = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 };
    let mut state = match init_state(interactive) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("error: {err}");
            return;
        }
    };

    loop {
        if let Err(err) = run_once(&mut state) {
            eprintln!("error: {err}");
        }
    }
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("HUSK_LOG", "info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
