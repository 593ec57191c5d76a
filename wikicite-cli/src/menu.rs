use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use wikicite::CitationScanner;
use wikicite::output::DEFAULT_CSV_PREFIX;
use wikicite_api::WikiClient;
use wikicite_cli::input::parse_limit;

use crate::cli::{analyze_titles, prompt_titles, scan_template};

const BANNER: &str = r"
+-----------------------------------------------+
|  Wikipedia Citation Analyzer (CLI Edition)    |
+-----------------------------------------------+
|  * Bot-authenticated API access               |
|  * Scans for incomplete Cite web templates    |
|  * Processes multiple articles                |
|  * CSV export capability                      |
+-----------------------------------------------+
";

fn prompt(message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Interactive loop: scan with CSV export, analyze specific articles, or exit.
///
/// A failed action is reported and the menu continues; end of input exits.
pub async fn run(client: &WikiClient, scanner: &CitationScanner) -> Result<()> {
    println!("{BANNER}");

    loop {
        println!("\n{}", "=".repeat(50));
        println!("1. Scan articles using the template (CSV export)");
        println!("2. Analyze specific articles (screen output only)");
        println!("3. Exit");
        let Some(choice) = prompt("\nChoose option (1-3): ")? else {
            break;
        };

        let outcome = match choice.as_str() {
            "1" => {
                let max = client.config().max_articles;
                let Some(answer) = prompt(&format!("\nHow many articles to scan? (Max {max}): "))?
                else {
                    break;
                };
                match parse_limit(&answer, max) {
                    Ok(limit) => {
                        scan_template(client, scanner, limit, Path::new("."), DEFAULT_CSV_PREFIX)
                            .await
                    }
                    Err(e) => Err(e),
                }
            }
            "2" => match prompt_titles() {
                Ok(titles) => analyze_titles(client, scanner, &titles).await,
                Err(e) => Err(e),
            },
            "3" => break,
            _ => {
                println!("Invalid choice. Please enter 1, 2, or 3.");
                Ok(())
            }
        };

        if let Err(e) = outcome {
            eprintln!("{} {e:#}", "Error:".red());
        }
    }

    println!("\nThank you for using Wikipedia Citation Analyzer!");
    Ok(())
}
