use clap::{Parser, ValueEnum};
use keiro::prelude::*;
use std::fs;
use std::time::Instant;

/// A call-flow graph compiler CLI: compile editor graphs into pathway
/// documents, decompile documents back into graphs, or just validate.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph or document JSON file
    input: String,

    /// What to do with the input
    #[arg(short, long, value_enum, default_value_t = Mode::Compile)]
    mode: Mode,

    /// Pathway name recorded in the compiled document
    #[arg(long, default_value = "Untitled Pathway")]
    name: String,

    /// Pathway description recorded in the compiled document
    #[arg(long, default_value = "")]
    description: String,

    /// Write the resulting JSON here instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Graph JSON in, pathway document JSON out
    Compile,
    /// Pathway document JSON in, graph JSON out
    Decompile,
    /// Graph JSON in, repaired graph JSON out, issues on stderr
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let content = fs::read_to_string(&cli.input)?;

    let started = Instant::now();
    let (result, issues) = match cli.mode {
        Mode::Compile => {
            let graph = EditorGraph::from_json(&content)?.into_graph()?;
            let compiled = Compiler::builder(graph)
                .with_name(&cli.name)
                .with_description(&cli.description)
                .build()
                .compile()?;
            (
                serde_json::to_string_pretty(&compiled.document)?,
                compiled.issues,
            )
        }
        Mode::Decompile => {
            let document = Document::from_json(&content)?;
            let graph = Decompiler::new(document).decompile()?;
            (serde_json::to_string_pretty(&graph)?, vec![])
        }
        Mode::Validate => {
            let graph = EditorGraph::from_json(&content)?.into_graph()?;
            let report = validate(&graph);
            (serde_json::to_string_pretty(&report.repaired)?, report.issues)
        }
    };
    let elapsed = started.elapsed();

    for issue in &issues {
        eprintln!("warning: {}", issue);
    }
    eprintln!("Finished in {:.2?} ({} issues)", elapsed, issues.len());

    match &cli.output {
        Some(path) => fs::write(path, result)?,
        None => println!("{}", result),
    }
    Ok(())
}
