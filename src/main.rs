use clap::Parser;
use mrzscan::models::{ExtractionResult, MrzRecord};
use mrzscan::ExtractionPipeline;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "mrzscan",
    about = "Extract machine-readable-zone data from a passport photo"
)]
struct Args {
    /// Path to the passport image (JPEG, PNG, ...)
    image: PathBuf,

    /// Print the extraction result as JSON instead of a report
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if !args.image.is_file() {
        eprintln!("error: no readable file at {:?}", args.image);
        return ExitCode::from(2);
    }

    let pipeline = ExtractionPipeline::new();
    let result = pipeline.extract_file(&args.image);

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    print_report(&result);
    ExitCode::SUCCESS
}

fn print_report(result: &ExtractionResult) {
    match &result.record {
        Some(MrzRecord::Decoded {
            names,
            nationality,
            number,
            date_of_birth,
            expiration_date,
            sex,
        }) => {
            println!("Extracted via {} strategy:", result.strategy);
            println!("  Name:            {}", field(names));
            println!("  Nationality:     {}", field(nationality));
            println!("  Document number: {}", field(number));
            println!("  Date of birth:   {}", field(date_of_birth));
            println!("  Expiry date:     {}", field(expiration_date));
            println!("  Sex:             {}", field(sex));
        }
        Some(MrzRecord::RawLines { line1, line2 }) => {
            println!("MRZ-shaped text found (fallback strategy, fields not decoded):");
            println!("  {}", line1);
            println!("  {}", line2);
        }
        None => {
            println!("Could not read the MRZ. Make sure the passport photo is sharp,");
            println!("well lit, and the bottom of the page is fully visible.");
        }
    }

    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(not recognized)")
}
