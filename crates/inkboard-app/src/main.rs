//! Main application entry point.

use inkboard_app::{AppError, Script, Session, ShortcutRegistry, load_settings};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Inkboard");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("inkboard: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let Some(arg) = std::env::args().nth(1) else {
        eprintln!("usage: inkboard <script.json> | --shortcuts");
        return Ok(());
    };
    if arg == "--shortcuts" {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let settings = load_settings()?;
    let script = Script::load(Path::new(&arg))?;
    let mut session = Session::new(&settings)?;
    session.run(&script)?;

    println!("{}", session.canvas().status());
    for notice in session.notices() {
        println!("{notice}");
    }
    Ok(())
}
