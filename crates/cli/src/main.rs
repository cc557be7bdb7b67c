// CLI output goes to stdout/stderr on purpose
#![allow(clippy::print_stderr)]

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = tsforge::cli::parse();
    std::process::exit(tsforge::run(cli));
}
