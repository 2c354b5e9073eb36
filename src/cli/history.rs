use anyhow::{bail, Context as _, Result};

use classicrypt::session::History;

use super::Invocation;

pub(crate) fn run_history(ctx: &Invocation, width: usize) -> Result<()> {
    let Some(path) = &ctx.history_path else {
        bail!("no history file: pass --history or set `history` in the config");
    };
    let history = History::load(path)
        .with_context(|| format!("cannot read history from {}", path.display()))?;

    if history.is_empty() {
        println!("(no entries)");
        return Ok(());
    }
    for (i, entry) in history.entries().iter().enumerate() {
        println!("{:>4}  {}", i + 1, entry.summary(width));
    }
    Ok(())
}
