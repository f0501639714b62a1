use std::process;

fn main() {
    match vireo::cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("vireo: {err:#}");
            process::exit(1);
        }
    }
}
