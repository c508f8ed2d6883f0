use std::process;

fn main() {
    match nbsite_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("nbsite error: {err}");
            process::exit(1);
        }
    }
}
