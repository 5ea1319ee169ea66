use qtrace::{runner, Config, Writer};
use std::process::ExitCode;

const USAGE: &str = "usage: qtrace [path | clear | tail [N] | run <command line>]";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env();

    match dispatch(&args, &config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("qtrace: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: &[String], config: &Config) -> qtrace::Result<u8> {
    match args.first().map(String::as_str) {
        None | Some("path") => {
            println!("{}", config.output_path.display());
        }
        Some("clear") => {
            Writer::from_config(config).truncate()?;
        }
        Some("tail") => {
            let n = args.get(1).and_then(|n| n.parse().ok()).unwrap_or(20);
            for line in runner::tail(&config.output_path, n)? {
                println!("{}", line);
            }
        }
        Some("run") => {
            // one argument is a whole command line, several are its words
            let words = match &args[1..] {
                [line] => runner::split_command(line)?,
                words => words.to_vec(),
            };
            let outcome = runner::run_traced(&words, config)?;
            print!("{}", outcome.appended);
            return Ok(u8::try_from(outcome.exit_code).unwrap_or(1));
        }
        Some(_) => {
            eprintln!("{}", USAGE);
            return Ok(2);
        }
    }
    Ok(0)
}
