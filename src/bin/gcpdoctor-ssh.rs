//! Remote command helper: run one command over SSH and print the result
//! as a single JSON object.
//!
//! Usage: gcpdoctor-ssh <host> <user> <password> <command>

use gcpdoctor::ssh::run_command;
use serde_json::json;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 4 {
        let usage = json!({
            "error": "uso: gcpdoctor-ssh <host> <user> <password> <command>"
        });
        println!("{}", usage);
        std::process::exit(1);
    }

    let result = run_command(&args[0], &args[1], &args[2], &args[3]);
    match serde_json::to_string(&result) {
        Ok(encoded) => println!("{}", encoded),
        Err(e) => {
            println!("{}", json!({ "error": format!("serializzazione fallita: {}", e) }));
            std::process::exit(1);
        }
    }
}
