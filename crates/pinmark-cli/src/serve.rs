use anyhow::Result;
use pinmark_core::{Action, Response, SessionEngine};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// One host event per input line.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Event {
    Query { query: String },
    Select { select: Action },
}

#[derive(Debug, Clone, Serialize)]
struct Reply {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Reply {
    fn data(resp: Response) -> Self {
        Self {
            ok: true,
            data: Some(resp),
            error: None,
        }
    }

    fn error(msg: String) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg),
        }
    }
}

/// Drive one session from `input` until EOF, answering each event on `out`.
pub fn run_serve<R: BufRead, W: Write>(engine: &mut SessionEngine, input: R, mut out: W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Event>(&line) {
            Ok(Event::Query { query }) => Reply::data(engine.handle_query(&query)),
            Ok(Event::Select { select }) => Reply::data(engine.handle_selection(select)),
            Err(e) => {
                tracing::debug!(error = %e, "bad event line");
                Reply::error(format!("invalid event: {e}"))
            }
        };
        serde_json::to_writer(&mut out, &reply)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }
    Ok(())
}
