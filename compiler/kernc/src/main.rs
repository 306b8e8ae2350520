//! Kern CLI
//!
//! Turns a row method of a description file into a loop-vectorized kernel.

use kernc::commands::{check_file, kernel_file, parse_file, run_file};
use kernc::options::Options;
use kernc::tracing_setup::init_tracing;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let options = match Options::parse(&args[2..]) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    match command.as_str() {
        "kernel" => kernel_file(&options),
        "check" => check_file(&options),
        "run" => run_file(&options),
        "parse" => parse_file(&options),
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-v" => {
            println!("kern {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Kern row-function vectorizer");
    println!();
    println!("Usage: kern <command> <file> [options]");
    println!();
    println!("Commands:");
    println!("  kernel <file>        Print the kernel for a row method");
    println!("  check <file>         Build the kernel and report problems");
    println!("  run <file>           Build the kernel and run it on --column values");
    println!("  parse <file>         List classes, methods and parameters");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --unit=<class>       Class declaring the row method (required)");
    println!("  --row=<method>       Row method to vectorize (required)");
    println!("  --inputs=<a,b,...>   Input column names, one per row parameter");
    println!("  --outputs=<a,b,...>  Output column names, one per returned value");
    println!("  --name=<name>        Kernel name (default: <method>_kernel)");
    println!("  --column=<1,2,...>   Input column for `run`; repeat once per input");
    println!("  --color=<mode>       auto, always, never");
    println!();
    println!("Examples:");
    println!("  kern kernel logic.py --unit=LeadLogic --row=run_all");
    println!("  kern check logic.py --unit=LeadLogic --row=run_all --outputs=a,b,c");
    println!("  kern run logic.py --unit=LeadLogic --row=run_all \\");
    println!("      --column=1,2 --column=3,4 --column=5,6 --column=7,8");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=kern_transform=debug) to trace the pipeline.");
}
