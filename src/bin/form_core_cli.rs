use std::{env, process};

use form_core::{
    cli::{run_cli, Screen},
    init,
    utils::build_info,
};

fn main() {
    init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = env::args().nth(1) else {
        print_usage();
        process::exit(1);
    };

    match command.as_str() {
        "version" | "--version" => println!("{}", build_info::current()),
        "help" | "--help" => print_usage(),
        other => run_cli(other.parse::<Screen>()?)?,
    }

    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: form_core_cli <screen>\n\
         Screens:\n  \
         settings\n  \
         change-password\n  \
         login\n\
         Other commands:\n  \
         version\n\
         Set FORM_CORE_CLI_SCRIPT=1 to read commands from stdin."
    );
}
