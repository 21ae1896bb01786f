//! Interactive assistant: builds every artifact from the data directory, then
//! answers questions read from stdin.

use std::collections::HashSet;
use std::io;

use clap::Parser;
use docqa_answer::{select_generator, Assistant};
use docqa_cli::{init_logging, repl, ConfigOverrides};
use docqa_vector::build_pipeline;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Answer questions over a folder of text documents")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    let config = cli.overrides.load()?;

    println!("\nDocQA assistant (local embeddings + exact vector index)");
    println!("Type a question. Type 'exit' to quit.\n");

    let (retriever, top_k) = build_pipeline(&config)?;
    let generator = select_generator(&config)?;
    let assistant = Assistant::new(retriever, generator, top_k);

    let docs: HashSet<&str> = assistant.retriever().metadata().iter().map(|c| c.doc_id.as_str()).collect();
    println!(
        "Indexed {} chunks from {} documents; retrieving top {} per question.\n",
        assistant.retriever().len(),
        docs.len(),
        assistant.top_k()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run_loop(&assistant, stdin.lock(), &mut stdout)?;
    Ok(())
}
