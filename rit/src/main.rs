mod cli;

pub fn main() -> ! {
    env_logger::builder().parse_env("RIT_LOG").init();
    match cli::run(std::env::args_os()) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1)
        }
    }
}
