use std::io::Write;

use anyhow::Result;
use backtrace::Backtrace;
use log::*;

use btsnap::RunConfig;

#[derive(structopt::StructOpt)]
#[structopt()]
struct Args {
    /// Silence all output
    #[structopt(short = "q", long = "quiet")]
    quiet: bool,
    /// Verbose mode (-v, -vv, -vvv, etc)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,
    /// Timestamp (sec, ms, ns, none)
    #[structopt(short = "t", long = "timestamp")]
    ts: Option<stderrlog::Timestamp>,
    /// Directory under which run directories are created. By default,
    /// the directory the tool is started from.
    #[structopt(parse(from_os_str), short = "w", long = "working-dir")]
    working_dir: Option<std::path::PathBuf>,
}

#[paw::main]
fn main(args: Args) -> Result<()> {
    stderrlog::new()
        .module(module_path!())
        .quiet(args.quiet)
        // Progress is shown by default; -v adds debug detail.
        .verbosity(args.verbose + 2)
        .timestamp(args.ts.unwrap_or(stderrlog::Timestamp::Off))
        .init()
        .unwrap();

    let current_dir = std::env::current_dir()?;
    let working_dir = args.working_dir.unwrap_or(current_dir);
    std::env::set_current_dir(working_dir)?;

    if let Err(e) = run_cli() {
        error!("Exception: {:#}: {:?}", e, Backtrace::new());
        println!("Exception: {e:#}");
        // Field units run this from a console window that closes on
        // exit; hold it open so the output can still be copied out.
        let _ = prompt(
            "Failure; possibly an unexpected snapshot structure; please report the \
             snapshot and the log output above to the BTS tooling maintainers",
        );
    }
    Ok(())
}

fn run_cli() -> Result<()> {
    loop {
        let snapshot_path = prompt("Enter snapshot.zip path: ")?;
        let run_root_name = prompt("Enter new directory name: ")?;
        println!("New directory for unzipping: {run_root_name}");

        let conf = RunConfig {
            snapshot_path: snapshot_path.into(),
            run_root: std::env::current_dir()?.join(run_root_name),
        };
        btsnap::run_snapshot(&conf)?;

        if prompt("Extract another (y/n):")? != "y" {
            println!("Exit");
            return Ok(());
        }
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
