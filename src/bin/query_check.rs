//! Apply a filter query and sort to an entry file and print what stays visible.

use clap::Parser;
use mailadmin::logging;
use mailadmin::mail::{self, sort_by_label};

#[derive(Parser)]
#[command(name = "query_check", about = "Run a filter query against an email log file")]
struct Args {
    /// JSON file with email records
    entries: String,
    /// Filter query, e.g. recipiant:"INCLUDES:example.com"
    #[arg(default_value = "")]
    query: String,
    /// Sort label: Oldest, Newest or "Email Status"
    #[arg(long)]
    sort: Option<String>,
}

fn main() {
    logging::init_stderr_tracing();
    let args = Args::parse();

    let entries = match mail::load_entries(&args.entries) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let entries = match &args.sort {
        Some(label) => sort_by_label(label, entries),
        None => entries,
    };

    let visible = mail::filter(&args.query, &entries);
    let shown: Vec<_> = entries
        .iter()
        .zip(&visible)
        .filter(|(_, v)| **v)
        .map(|(e, _)| e)
        .collect();

    for entry in &shown {
        println!(
            "{:19} {:>5} {:30} {}",
            entry.sent_display(),
            entry.status_display(),
            entry.recipient_display(),
            entry.subject_display()
        );
    }
    println!("\n{} of {} entries shown", shown.len(), entries.len());
}
