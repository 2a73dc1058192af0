use chrono::Local;
use clap::{Parser, Subcommand};
use screenroom::{dataset, flatten, Category, FlatRecord, Summary};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "screenroom")]
#[command(author, version, about = "Explore video interview analysis results from the terminal or the browser")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Dataset to load (run `screenroom datasets` to list them)
    dataset: Option<String>,

    /// Directory containing the dataset files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Output report file (.csv, .json, .html)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "screenroom-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate CSV report
    #[arg(long)]
    no_report: bool,

    /// Don't prompt to open report
    #[arg(long)]
    no_open: bool,

    /// Show per-metric scores for each response
    #[arg(short, long)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start interactive dashboard in the browser
    Serve {
        /// Directory containing the dataset files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3400")]
        port: u16,
    },

    /// List known datasets and whether their source files are present
    Datasets {
        /// Directory containing the dataset files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    // Handle subcommands first
    if let Some(cmd) = args.command {
        match cmd {
            Command::Serve { data_dir, port } => {
                if let Err(e) = screenroom::serve::start(port, data_dir) {
                    eprintln!("Server error: {}", e);
                    std::process::exit(1);
                }
                return;
            }
            Command::Datasets { data_dir } => {
                list_datasets(&data_dir);
                return;
            }
        }
    }

    let name = if let Some(name) = args.dataset.clone() {
        name
    } else {
        eprintln!("Usage: screenroom <DATASET>");
        eprintln!("Run 'screenroom --help' for more options.");
        eprintln!("Known datasets: {}", dataset::names().join(", "));
        std::process::exit(1);
    };

    let ds = match dataset::find(&name) {
        Some(ds) => ds,
        None => {
            eprintln!("Unknown dataset '{}'", name);
            eprintln!("Known datasets: {}", dataset::names().join(", "));
            std::process::exit(1);
        }
    };

    let records = match flatten::load_table(&args.data_dir, ds) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Failed to load '{}': {}", ds.file, e);
            std::process::exit(1);
        }
    };

    if !args.quiet {
        eprintln!("\x1b[1mScreenroom - Interview Analysis\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Loaded {} response(s) from {}\n", records.len(), ds.file);
    }

    // Print results
    if !args.quiet {
        for r in &records {
            let overall = row_mean(r);
            let color = score_color(overall);
            let reset = "\x1b[0m";

            let category_cells: Vec<String> = Category::ALL
                .iter()
                .map(|c| {
                    let value = screenroom::aggregate::category_average(std::slice::from_ref(r), *c);
                    format!("{}:{}", &c.name()[..1], format_score(value))
                })
                .collect();

            println!(
                "{}[{}]{}  {:<24}  {}  {}",
                color,
                format_score(overall),
                reset,
                truncate(&r.full_name(), 24),
                category_cells.join("  "),
                truncate(r.question.as_deref().unwrap_or("-"), 44)
            );

            if args.verbose {
                for category in Category::ALL {
                    let scores: Vec<String> = category
                        .metrics()
                        .iter()
                        .map(|m| format!("{}={}", m.label(), format_score(r.metric(*m))))
                        .collect();
                    eprintln!("    {}: {}", category.name(), scores.join(" "));
                }
            }
        }
    }

    // Summary
    let summary = Summary::from_records(&records);
    if !args.quiet {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!("\x1b[1mSummary:\x1b[0m");
        eprintln!("  Responses:  {}", summary.total);
        eprintln!("  Candidates: {}", summary.candidates);
        eprintln!("  Questions:  {}", summary.questions);
        for (name, value) in summary.categories() {
            eprintln!(
                "  {}{:<15}{} {}",
                score_color(value),
                format!("{}:", name),
                "\x1b[0m",
                format_score(value)
            );
        }
    }

    // Determine report path
    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        // Auto-generate report
        std::fs::create_dir_all(&args.report_dir).ok();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("screenroom_{}_{}.csv", ds.name, timestamp);
        Some(args.report_dir.join(filename))
    } else {
        None
    };

    // Generate report
    if let Some(ref output_path) = report_path {
        if let Err(e) = screenroom::report::generate(output_path, &records) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }

        // Open report
        if !args.no_open && !args.quiet {
            eprint!("\nOpen report? [Y/n] ");
            io::stderr().flush().ok();

            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_ok() {
                let input = input.trim().to_lowercase();
                if input.is_empty() || input == "y" || input == "yes" {
                    if let Err(e) = open::that(output_path) {
                        eprintln!("Failed to open report: {}", e);
                    }
                }
            }
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mDone.\x1b[0m");
    }
}

fn list_datasets(data_dir: &std::path::Path) {
    println!("{:<12} {:<36} {:<18} {}", "NAME", "FILE", "SHAPE", "STATUS");
    println!("{}", "-".repeat(78));
    for ds in dataset::DATASETS {
        let shape = match ds.shape {
            dataset::SourceShape::GroupedVideos => "grouped videos",
            dataset::SourceShape::SingleResponse => "single response",
        };
        let status = if data_dir.join(ds.file).exists() {
            "present"
        } else {
            "missing"
        };
        println!("{:<12} {:<36} {:<18} {}", ds.name, ds.file, shape, status);
    }
}

/// Mean over every metric score the record has.
fn row_mean(record: &FlatRecord) -> Option<f64> {
    let values: Vec<f64> = Category::ALL
        .iter()
        .flat_map(|c| c.metrics())
        .filter_map(|m| record.metric(*m))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>4.1}", v),
        None => "   -".to_string(),
    }
}

fn score_color(value: Option<f64>) -> &'static str {
    match value {
        Some(v) if v >= 7.0 => "\x1b[32m", // Green
        Some(v) if v >= 4.0 => "\x1b[33m", // Yellow
        Some(_) => "\x1b[31m",             // Red
        None => "\x1b[90m",                // Gray
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
