// File: ./src/cli.rs
//! Shared command-line interface logic, like printing help.

pub fn print_help(binary_name: &str) {
    println!(
        "Timegrid v{} - Turn spreadsheet timetables into iCalendar feeds",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--config <path>] [-v | -q]", binary_name);
    println!("    {} init [--config <path>]", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>   Use a different config file.");
    println!("    -v, --verbose         Log per-cell details.");
    println!("    -q, --quiet           Only log warnings and errors.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    init                  Write a default config file and exit.");
    println!();
    println!("CONFIG:");
    println!("    Each [[targets]] entry names a sheet dump (Sheets API v4 JSON with");
    println!("    \"values\" and \"merges\") and the semester its classes repeat over:");
    println!();
    println!("    [[targets]]");
    println!("    name = \"BS - Year 1\"");
    println!("    source = \"sheets/bs1.json\"");
    println!("    semester_start = \"2023-01-23\"");
    println!("    semester_end = \"2023-03-19\"");
}
