//! The `funson` binary: see [`funson::cli`].

fn main() -> std::process::ExitCode {
    funson::cli::run()
}
