mod app;
mod cli;
mod collection;
mod config;
mod error;
mod storage;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
