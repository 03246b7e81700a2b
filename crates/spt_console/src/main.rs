use clap::Parser;

mod console;

fn main() -> anyhow::Result<()> {
    console::run_app(console::args::Args::parse())
}
