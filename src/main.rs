use std::io;

use anyhow::Result;
use log::debug;
use structopt::StructOpt;

use avl::menu::{self, Session};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "avl-menu",
    about = "Build and edit an AVL tree from an interactive menu"
)]
struct Opts {
    /// Comma-separated keys to build a tree from before the menu starts
    #[structopt(long)]
    keys: Option<String>,

    /// Silence all log output
    #[structopt(short, long)]
    quiet: bool,

    /// Log verbosity (-v, -vv, -vvv, etc)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> Result<()> {
    let opts = Opts::from_args();
    stderrlog::new()
        .module(module_path!())
        .module("avl")
        .quiet(opts.quiet)
        .verbosity(opts.verbose)
        .init()?;
    debug!("{:?}", opts);

    let mut session = Session::new();
    if let Some(keys) = &opts.keys {
        for line in session.create(&menu::parse_keys(keys)?) {
            println!("{}", line);
        }
    }

    session.run(io::stdin().lock(), io::stdout().lock())
}
