mod catalog;
mod config;
mod library;
mod metadata;
mod runtime;
mod sync;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
