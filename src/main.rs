use colored::Colorize;

fn main() {
    if let Err(e) = mgpipe::run() {
        eprintln!("{}: {e:?}", "ERROR".red());
        std::process::exit(1);
    }
}
