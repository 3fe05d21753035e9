use clap::{Parser, ValueEnum};
use fiber_survey::budget::BudgetParams;
use fiber_survey::materials::MaterialParams;
use fiber_survey::report::{self, ReportOptions, Section};
use fiber_survey::{analyze, render, typst, validate};
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Typst,
}

/// Distances, progress and material estimates for a fiber project KML.
#[derive(Parser)]
struct Cli {
    path: String,
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
    /// Sections to print (repeatable); all of them by default.
    #[arg(long = "report", value_enum)]
    sections: Vec<Section>,
    /// Restrict the POP detail tables to this POP.
    #[arg(long)]
    pop: Option<String>,
    /// Cable price in R$ per metre.
    #[arg(long, env = "FIBER_CABLE_COST", default_value_t = 10.0)]
    cable_cost: f64,
    /// Other materials as a fraction of the cable cost.
    #[arg(long, env = "FIBER_OVERHEAD", default_value_t = 0.20)]
    overhead: f64,
    /// Cable reserve margin as a fraction of the drawn length.
    #[arg(long, env = "FIBER_RESERVE_MARGIN", default_value_t = 0.10)]
    reserve_margin: f64,
    /// Metres between poles.
    #[arg(long, env = "FIBER_POLE_SPACING", default_value_t = 40.0)]
    pole_spacing: f64,
    /// Metres between technical reserve loops.
    #[arg(long, env = "FIBER_LOOP_SPACING", default_value_t = 500.0)]
    loop_spacing: f64,
    /// Only check that the file is well-formed KML.
    #[arg(long)]
    validate_only: bool,
    /// Write the report here instead of stdout.
    #[arg(long, short)]
    output: Option<String>,
}

impl Cli {
    fn options(&self) -> ReportOptions {
        ReportOptions {
            sections: self.sections.clone(),
            pop: self.pop.clone(),
            budget: BudgetParams {
                cable_cost: self.cable_cost,
                overhead: self.overhead,
            },
            materials: MaterialParams {
                reserve_margin: self.reserve_margin,
                pole_spacing: self.pole_spacing,
                loop_spacing: self.loop_spacing,
            },
        }
    }
}

fn run(args: &Cli) -> fiber_survey::Result<String> {
    let content = validate::read_file(&args.path)?;
    if args.validate_only {
        let inventory = validate::validate(&content)?;
        return Ok(format!("{}: ok ({})\n", args.path, inventory));
    }
    let analysis = analyze(&content)?;
    let tables = report::build(&analysis.survey, &args.options())?;
    log::trace!("tables: {}", tables.len());
    match args.format {
        Format::Text => Ok(render::text(&tables)),
        Format::Json => render::json(&analysis.inventory, &analysis.survey, &tables),
        Format::Typst => Ok(typst::make_typst_document(&args.path, &tables)),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();
    let out = match run(&args) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{}: {}", args.path, e);
            return ExitCode::FAILURE;
        }
    };
    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, out) {
                eprintln!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
            log::info!("report written to {}", path);
        }
        None => print!("{}", out),
    }
    ExitCode::SUCCESS
}
