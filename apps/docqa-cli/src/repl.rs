use std::io::{self, BufRead, Write};

use docqa_answer::{Answer, Assistant};
use docqa_core::VectorIndex;

pub const PROMPT: &str = "You: ";

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

pub fn write_answer<W: Write>(out: &mut W, answer: &Answer) -> io::Result<()> {
    let gen = &answer.generation;
    writeln!(out, "\nAssistant:\n{}", gen.answer)?;
    writeln!(out, "\n---")?;
    writeln!(out, "Used LLM: {}", gen.used_remote)?;
    writeln!(out, "Latency: {:.1} ms", gen.latency_ms())?;
    writeln!(out, "Top score: {:.3} | Avg score: {:.3}", answer.stats.top_score, answer.stats.avg_score)?;
    writeln!(out, "Retrieved docs: {}", answer.stats.doc_ids.join(", "))?;
    if gen.used_remote {
        writeln!(
            out,
            "Docs mentioned in answer: {} -> {:?}",
            answer.grounding.mentioned_count, answer.grounding.docs_mentioned
        )?;
    }
    writeln!(out, "---\n")
}

/// Read questions until `exit`, `quit` or end of input. A failed question,
/// including a line that is not valid UTF-8, is reported and the loop keeps
/// going. Only read and write failures end it early.
pub fn run_loop<I, R, W>(assistant: &Assistant<I>, mut input: R, out: &mut W) -> io::Result<()>
where
    I: VectorIndex,
    R: BufRead,
    W: Write,
{
    let mut buf = Vec::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let question = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable input line");
                writeln!(out, "\nError: input is not valid UTF-8 ({e})\n")?;
                continue;
            }
        };
        if question.is_empty() {
            continue;
        }
        if is_exit(question) {
            return Ok(());
        }
        match assistant.ask(question) {
            Ok(answer) => write_answer(out, &answer)?,
            Err(e) => {
                tracing::warn!(error = %e, "question failed");
                writeln!(out, "\nError: {e}\n")?;
            }
        }
    }
}
