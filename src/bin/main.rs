use std::env;
use std::path::Path;
use std::process::ExitCode;
use xflr5_export::config::ExportJob;
use xflr5_export::export::export_wing;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let dump_sections = args.iter().any(|a| a == "--dump-sections");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    if positional.len() != 2 {
        eprintln!("usage: xflr5-export <job.json> <output.xml> [--dump-sections]");
        return ExitCode::from(2);
    }

    match run(positional[0], positional[1], dump_sections) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            // Report and stop without writing anything further; partial
            // airfoil files may already exist next to the output path.
            eprintln!("Warning: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(job_path: &str, output_path: &str, dump_sections: bool) -> Result<(), String> {
    let text = std::fs::read_to_string(job_path)
        .map_err(|e| format!("couldn't read {job_path}: {e}"))?;
    let job: ExportJob =
        serde_json::from_str(&text).map_err(|e| format!("couldn't parse {job_path}: {e}"))?;

    let summary = export_wing(&job.wing, &job.panels, Path::new(output_path))
        .map_err(|e| e.to_string())?;

    if dump_sections {
        let dump = serde_json::to_string_pretty(&summary.table)
            .map_err(|e| format!("couldn't serialize section table: {e}"))?;
        println!("{dump}");
    }

    println!(
        "Wrote {} with {} sections and {} airfoil file(s)",
        summary.xml_path.display(),
        summary.table.sections.len(),
        summary.airfoil_paths.len()
    );
    Ok(())
}
