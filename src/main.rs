fn main() {
    if let Err(err) = servicenow_schema::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
