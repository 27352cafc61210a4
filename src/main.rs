use clap::Parser;
use log::info;
use p100::mach::{Config, Runtime};
use std::path::PathBuf;
use std::time::Duration;

/// Microcontroller command console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// read raw bytes from stdin instead of the line editor
    #[arg(long)]
    pipe: bool,

    /// write the input echo to stdout in pipe mode
    #[arg(long)]
    echo: bool,

    /// ticker quantum in milliseconds
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// keep running this long after stdin closes in pipe mode
    #[arg(long, default_value_t = 0)]
    linger_ms: u64,

    /// do not style error lines
    #[arg(long)]
    no_color: bool,

    /// enable debug messages
    #[arg(short, long)]
    verbose: bool,

    /// write log to file instead of stderr
    #[arg(short, long)]
    logfile: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter(None, log::LevelFilter::Debug);
    } else {
        builder.filter(None, log::LevelFilter::Warn);
    }
    if let Some(ref logfile) = args.logfile {
        match std::fs::File::create(logfile) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(error) => eprintln!("Can't create logfile: {}", error),
        }
    }
    builder.init();

    let config = Config {
        tick: Duration::from_millis(args.tick_ms.max(1)),
        ..Config::default()
    };
    info!("Starting console with {:?}", config);
    let runtime = Runtime::new(config);
    if args.pipe {
        p100::term::pipe::main(runtime, args.echo, Duration::from_millis(args.linger_ms));
    } else {
        p100::term::main(runtime, !args.no_color);
    }
}
